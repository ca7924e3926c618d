//! Enumerable: successor and predecessor

use super::Typeclass;

pub fn typeclass() -> Typeclass {
    Typeclass::new("Enumerable", 1)
        .method("succ", 1)
        .method("pred", 1)
        .minimal(&["succ", "pred"])
}
