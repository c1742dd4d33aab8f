//! # Creator Dashboard - Cargo 构建脚本
//!
//! 启用 `desktop` feature 时由 Tauri 完成构建准备工作：
//! - 生成 Tauri 运行时所需的资源绑定代码
//! - 处理权限清单（`capabilities/`）等静态资源
//!
//! 未启用 `desktop` 时仅编译核心库，此脚本不做任何事。

fn main() {
    #[cfg(feature = "desktop")]
    tauri_build::build();
}
