use crate::RequestId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch and assemble the sheet at `url`; completion comes back as
    /// `Msg::LoadFinished` carrying the same `request_id`.
    LoadSheet { request_id: RequestId, url: String },
}
