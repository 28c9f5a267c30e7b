mod forwarding_table;
pub use self::forwarding_table::*;

mod arp_table;
pub use self::arp_table::*;

mod route_table;
pub use self::route_table::*;
