pub mod capture;
pub mod notification_center;
pub mod reactor;
