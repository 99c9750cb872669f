//! Shared helpers for unit tests.

#![allow(clippy::expect_used)]

use fleet_console::application::{ProgressReporter, RpcClient, SchemaRegistry};
use fleet_console::domain::ServerConfig;
use mockall::mock;

use crate::fake_server::{FakeConfigServer, FakeTransport};

/// A client wired to `server` through the default endpoint table.
pub fn client(server: &FakeConfigServer) -> RpcClient<FakeTransport<'_>> {
    let registry = SchemaRegistry::load(&ServerConfig::default()).expect("default settings load");
    RpcClient::new(registry, FakeTransport { server })
}

mock! {
    pub Reporter {}

    impl ProgressReporter for Reporter {
        fn step(&self, message: &str);
        fn success(&self, message: &str);
        fn warn(&self, message: &str);
    }
}

/// A reporter that accepts any progress event.
pub fn quiet_reporter() -> MockReporter {
    let mut reporter = MockReporter::new();
    reporter.expect_step().returning(|_| ());
    reporter.expect_success().returning(|_| ());
    reporter.expect_warn().returning(|_| ());
    reporter
}
