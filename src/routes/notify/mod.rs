mod handler;
mod model;

pub use handler::{check_status, get_location, notify, owner_confirm};
pub use model::{
    DEFAULT_MESSAGE, NotifyCoordinator, NotifyRequest, OWNER_CONFIRM_PATH, OwnerConfirmRequest,
    StatusResponse, SuccessResponse, format_alert_body,
};
