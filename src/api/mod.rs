pub mod department;
pub mod employee;
pub mod half_day_option;
pub mod leave_request;
pub mod position;
