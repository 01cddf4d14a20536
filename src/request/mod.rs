//! Request building: parameter model, action registry, call resolution and
//! assembly of the unsigned request.

mod assemble;
mod operation;
mod params;
mod resolve;

pub use assemble::{UnsignedRequest, FORM_CONTENT_TYPE};
pub use operation::{Ec2Operation, EndpointKind, OperationDescriptor, ResponseKind};
pub use params::{EncodingProfile, FormParams, IndexBase};
pub use resolve::{Call, EndpointTarget, RequestResolver, ResolvedRequest};
