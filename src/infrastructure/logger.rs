//! 日志基础设施

use tracing_subscriber::{fmt, EnvFilter};

pub struct Logger;

impl Logger {
    /// 初始化全局订阅者；`RUST_LOG` 优先于配置文件里的级别
    pub fn init(level: &str) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("{level},tower_http=debug")));

        fmt().with_env_filter(filter).with_target(false).compact().init();
    }
}
