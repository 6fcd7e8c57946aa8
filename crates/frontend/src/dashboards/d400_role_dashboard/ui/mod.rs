mod dashboard;

pub use dashboard::RoleDashboard;
