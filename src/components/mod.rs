// ABOUTME: UI components for the TUI interface including panel list, panel view, and help

pub mod help;
pub mod layout;
pub mod notifications;
pub mod panel_list;
pub mod panel_view;

pub use help::HelpComponent;
pub use layout::LayoutComponent;
pub use notifications::NotificationsComponent;
pub use panel_list::PanelListComponent;
pub use panel_view::PanelViewComponent;
