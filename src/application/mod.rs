//! Application layer: one controller per console page

pub mod charts;
pub mod dashboard;
pub mod forms;
pub mod messages;
pub mod moderation;
pub mod operations;
pub mod ports;
pub mod theme;
pub mod users;

pub use charts::{fetch_users_chart_data, ChartPeriod, LineChart, UsersChart};
pub use dashboard::{CounterAnimation, Dashboard, DashboardStats, PasswordPolicy, SystemConfig};
pub use forms::{StaffForm, StaffFormSubmitter, SubmitOutcome};
pub use messages::{FlashMessage, MessageBridge, PageData};
pub use moderation::{Moderation, ModerationAction, ModerationOutcome};
pub use operations::{ExportTable, SuperuserOperations};
pub use ports::{DialogChoice, Dialogs, FailureDialog, UserGateway};
pub use theme::{Theme, ThemeToggle, ThemeView};
pub use users::UsersManagement;
