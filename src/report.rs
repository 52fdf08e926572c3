use colored::Colorize;
use std::net::Ipv4Addr;

use crate::net::Net;

// Pad before colorizing so escape codes do not count against the
// column width.
fn field<T: ToString>(value: T) -> String {
    format!("{:<16}", value.to_string())
}

pub fn describe_address(net: &Net, wildcard: bool) {
    println!("address   : {}", field(net.addr()).blue());
    println!(
        "netmask   : {}(0x{:08x})",
        field(net.subnetmask()).green(),
        net.subnetmask_u32()
    );
    if wildcard {
        println!("wildcard  : {}", field(net.wildcard()).cyan());
    }
    println!(
        "network   : {}/{}",
        field(net.network_address()).yellow(),
        net.prefix_len()
    );
    match net.prefix_len() {
        32 => println!("host route: {}", field(net.addr()).yellow()),
        31 => {
            let (min, max) = net.host();
            println!("host min  : {}", field(min).yellow());
            println!("host max  : {}", field(max).yellow());
        }
        _ => {
            let (min, max) = net.host();
            println!("broadcast : {}", field(net.broadcast_address()).purple());
            println!("host min  : {}", field(min).yellow());
            println!("host max  : {}", field(max).yellow());
        }
    }
    println!("hosts/net : {}", net.host_count().to_string().cyan());
}

pub fn describe_mask(prefix_len: u8, mask: u32, wildcard: bool) {
    println!("netmask   : {}", Ipv4Addr::from(mask).to_string().green());
    if wildcard {
        println!("wildcard  : {}", Ipv4Addr::from(!mask).to_string().cyan());
    }
    println!("hex mask  : 0x{:08x}", mask);
    println!("prefixlen : {}", prefix_len.to_string().green());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_are_padded_to_report_width() {
        assert_eq!(field(Ipv4Addr::new(10, 0, 0, 1)), "10.0.0.1        ");
        assert_eq!(field("255.255.255.255"), "255.255.255.255 ");
    }
}
