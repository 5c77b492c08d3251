//! Upload intake: the resource model, the pre-extraction validator, and the
//! in-memory working set that owns every resource for the session.

pub mod handlers;
pub mod resource;
pub mod validator;
pub mod working_set;
