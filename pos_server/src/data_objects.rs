use pos_engine::order_objects::RequestedItem;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/orders`. Any pricing information the client includes is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewOrderRequest {
    #[serde(default)]
    pub items: Vec<RequestedItem>,
}

/// Body of `PUT /api/orders/{id}/status`. The status is kept as text so that the engine can reject unknown values
/// with a meaningful message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// Body of `PUT /api/orders/{id}/payment`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub payment_method: String,
}

/// Query string of the report endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportQuery {
    /// `YYYY-MM-DD`. Defaults to today.
    pub date: Option<String>,
}
