//! Taximail Node - Operation Dispatcher
//!
//! Turns host items into Taximail API calls and normalizes the replies:
//!
//! - `adapter`: loosely-typed item parameters to `OperationRequest`
//! - `builders`: one pure request builder per operation
//! - `normalize`: upstream response to result envelope
//! - `dispatcher`: routing, batch execution and the OTP verify flow

pub mod adapter;
pub mod builders;
pub mod dispatcher;
pub mod normalize;

pub use adapter::{parse_item, ItemParameters};
pub use builders::{
    build_check_status, build_email, build_sms, build_sms_otp, build_verify_otp,
    EMAIL_ID_PREFIX, SMS_ID_PREFIX,
};
pub use dispatcher::{Clock, Dispatcher, MessageIdSource};
pub use normalize::{send_envelope, sms_otp_envelope, status_envelope, verification_envelope};
