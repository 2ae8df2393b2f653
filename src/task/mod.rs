pub mod keyboard;
pub mod scancode;
