pub mod mortgage;
pub mod session;
