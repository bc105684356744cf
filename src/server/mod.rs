//! Server side of the SMSSync web service protocol.

pub mod webservice;

pub use webservice::WebService;
