//! Bitwise operations

use super::Typeclass;

pub fn typeclass() -> Typeclass {
    Typeclass::new("Bitwise", 2)
        .method("bitand", 2)
        .method("bitor", 2)
        .method("bitxor", 2)
        .method("shift_left", 2)
        .method("shift_right", 2)
        .method("compl", 1)
        .minimal(&["bitand", "bitor", "bitxor", "shift_left", "shift_right", "compl"])
}
