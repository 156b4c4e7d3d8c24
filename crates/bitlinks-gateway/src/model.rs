mod bitlinks;

pub use bitlinks::{
    AjaxBitlinksResponse, BitlinksForm, BitlinksQuery, BitlinksResponse, ErrorResponse,
    HealthResponse,
};
