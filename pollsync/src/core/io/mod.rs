pub(crate) mod api_message;
pub(crate) mod callback;
pub(crate) mod notification;
