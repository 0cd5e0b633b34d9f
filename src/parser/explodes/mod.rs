pub mod clash;
pub mod common;
pub mod ss;
pub mod trojan;
pub mod vmess;

pub use clash::explode_clash;
pub use common::explode;
pub use ss::explode_ss;
pub use trojan::explode_trojan;
pub use vmess::{explode_vmess, vmess_to_clash};
