use serde::Serialize;

/// Success envelope: `{"status": true, "content": {"data": ...}}`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub status: bool,
    pub content: DataContent<T>,
}

#[derive(Debug, Serialize)]
pub struct DataContent<T> {
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            status: true,
            content: DataContent { data },
        }
    }
}

/// Bare success envelope used by delete endpoints.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: bool,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { status: true }
    }
}
