#[cfg(not(feature = "acceptance-tests"))]
mod mock_server;
pub mod test_context;

/// Card number the local mock gateway always declines.
#[cfg(not(feature = "acceptance-tests"))]
pub static DECLINED_CARD_NUMBER: &str = "4000000000000002";
