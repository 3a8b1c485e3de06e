//! 共享 HTTP 客户端
//!
//! 进程内只创建一次 `reqwest::Client`，所有调用复用其连接，进程退出前不释放。

use std::sync::OnceLock;

static HTTP_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// 获取进程级共享客户端（首次调用时初始化）。
pub fn http_client() -> &'static reqwest::Client {
    HTTP_CLIENT.get_or_init(reqwest::Client::new)
}
