pub mod attendance;
pub mod correction_request;
pub mod employee;
pub mod leave_request;
