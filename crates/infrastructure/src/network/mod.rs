pub mod hostname_trie;
pub mod ip_blacklist;
pub mod policy_dialer;

pub use hostname_trie::HostnameTrie;
pub use ip_blacklist::IpBlacklist;
pub use policy_dialer::PolicyDialer;
