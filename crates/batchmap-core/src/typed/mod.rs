//! Typed - codecs and transform traits.
//!
//! # Two layers
//! - **Typed**: `Transform<C>` against a `PayloadCodec`; the codec fixes whether
//!   the transform sees bytes or JSON, so the mode contract is checked at compile time.
//! - **Dyn**: `DynTransform`, object-safe, works on `Dynamic` values and is what
//!   the invoker calls. Typed transforms are erased into it by `TypedTransform`.

pub mod codec;
pub mod completion;
pub mod transform;

pub use self::codec::{Json, PayloadCodec, PayloadMode, Raw};
pub use self::completion::Completion;
pub use self::transform::{
    DynTransform, FnTransform, Transform, TransformOutput, TransformResult, TypedFn,
    TypedTransform, from_fn, typed_fn,
};
