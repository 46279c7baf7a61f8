pub mod auth_forms;
pub mod chat_area;
pub mod device_detail;
pub mod device_form;
pub mod device_list;
pub mod input_bar;
pub mod profile;
pub mod sidebar;
