//! UI Components
//!
//! Pages and the pieces they are built from.

mod assistant_panel;
mod auth_form;
mod board_transfer;
mod dashboard;
mod delete_confirm_button;
mod kanban_board;
mod materials_panel;
mod new_task_form;
mod notice;
mod sidebar;
mod subject_tabs;
mod task_card;

pub use assistant_panel::AssistantPanel;
pub use auth_form::{LoginForm, RegisterForm};
pub use board_transfer::BoardTransfer;
pub use dashboard::Dashboard;
pub use delete_confirm_button::DeleteConfirmButton;
pub use kanban_board::KanbanBoard;
pub use materials_panel::MaterialsPanel;
pub use new_task_form::NewTaskForm;
pub use notice::NoticeBar;
pub use sidebar::Sidebar;
pub use subject_tabs::SubjectTabs;
pub use task_card::TaskCard;
