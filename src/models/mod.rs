pub mod device;
pub mod visitor_log;
