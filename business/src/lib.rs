pub mod application {
    pub mod database {
        pub mod pool_manager;
        pub mod scoped_session;
    }
}

pub mod domain {
    pub mod errors;
    pub mod logger;
    pub mod database {
        pub mod connection_string;
        pub mod engine;
        pub mod lifecycle;
        pub mod pool_settings;
        pub mod schema;
    }
}

#[cfg(test)]
pub(crate) mod test_helpers;
