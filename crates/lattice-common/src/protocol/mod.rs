pub mod error;
pub mod requests;
pub mod responses;


pub use error::{LatticeError, Result, TRANSPORT_FALLBACK_MESSAGE};
pub use requests::{MethodName, Request, RequestId, RpcArgs};
pub use responses::{Response, RpcResult};
