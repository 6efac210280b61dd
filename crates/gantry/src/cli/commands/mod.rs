//! CLI commands

mod doctor;
mod resolve;
mod sign;
mod verify;

pub use doctor::DoctorCommand;
pub use resolve::ResolveCommand;
pub use sign::SignCommand;
pub use verify::VerifyCommand;
