use once_cell::sync::OnceCell;

use crate::logging;

pub mod datetime;
pub mod http;
pub mod text;

static RUSTLS_PROVIDER: OnceCell<()> = OnceCell::new();

/// reqwest 使用 `rustls-no-provider`，建立 client 前需先安裝 ring 作為預設的加密實作
pub fn ensure_rustls_crypto_provider() {
    RUSTLS_PROVIDER.get_or_init(|| {
        if rustls::crypto::CryptoProvider::get_default().is_none()
            && rustls::crypto::ring::default_provider()
                .install_default()
                .is_err()
        {
            logging::error_console("Failed to install the rustls ring provider".to_string());
        }
    });
}
