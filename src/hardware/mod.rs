pub mod clock;
pub mod i8042;
pub mod io;
pub mod status;
