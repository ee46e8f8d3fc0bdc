//! Authentication: password hashing, the token codec, and the request
//! extractor that resolves a bearer token to its group.

pub mod current_group;
pub mod password;
pub mod token;
