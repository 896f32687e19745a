pub mod create_mail_item;
pub mod mail_item;
pub mod mail_item_json;
pub mod mapper;
pub mod stored_mail_item;
