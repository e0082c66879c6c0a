
#[cfg(not(feature = "acceptance-tests"))]
pub use local_mock::TestContext;
#[cfg(feature = "acceptance-tests")]
pub use sandbox::TestContext;
