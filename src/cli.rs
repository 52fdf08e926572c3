use std::net::Ipv4Addr;

use crate::net::{self, Error, Net};
use crate::split;

#[derive(clap::Parser, Debug)]
#[command(
    about = "IPv4 subnetting calculator",
    override_usage = "ipcalc [-c] addr / mask\n       ipcalc [-c] -n mask\n       ipcalc [-vc] -s list addr / mask\n       ipcalc [-vc] -r addr : addr"
)]
pub struct Args {
    /// show the wildcard mask
    #[arg(short = 'c')]
    pub wildcard: bool,

    /// full report per block instead of one-line CIDR notation
    #[arg(short = 'v')]
    pub verbose: bool,

    /// describe a bare mask
    #[arg(short = 'n', conflicts_with_all = ["split", "find"])]
    pub mask: bool,

    /// split the network into blocks holding the given host counts
    #[arg(short = 's', value_name = "LIST", conflicts_with = "find")]
    pub split: Option<String>,

    /// find the covering networks for an address range
    #[arg(short = 'r')]
    pub find: bool,

    #[arg(value_name = "ARG", num_args = 1..=3, required = true)]
    pub operands: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Describe { net: Net },
    DescribeMask { prefix_len: u8, mask: u32 },
    Split { net: Net, capacities: Vec<u32> },
    Find { start: Ipv4Addr, end: Ipv4Addr },
}

impl Args {
    pub fn command(&self) -> Result<Command, Error> {
        if self.mask {
            let [operand] = self.operands.as_slice() else {
                return Err(Error::Usage);
            };
            let (prefix_len, mask) = net::parse_prefix_or_mask(operand)?;
            return Ok(Command::DescribeMask { prefix_len, mask });
        }

        let sep = if self.find { ':' } else { '/' };
        let (left, right) = self.split_operands(sep)?;

        if self.find {
            let start = net::parse_address(left)?;
            let end = net::parse_address(right)?;
            if u32::from(start) > u32::from(end) {
                return Err(Error::InvalidRange(format!("{left}:{right}")));
            }
            return Ok(Command::Find { start, end });
        }

        let addr = net::parse_address(left)?;
        let (prefix_len, _) = net::parse_prefix_or_mask(right)?;
        let net = Net::new(addr, prefix_len)?;
        match &self.split {
            Some(list) => Ok(Command::Split {
                net,
                capacities: split::parse_capacities(list)?,
            }),
            None => Ok(Command::Describe { net }),
        }
    }

    // The address and prefix/mask (or range end) may arrive as one
    // combined token, as two operands, or with the separator as its own
    // operand, which is never inspected.
    fn split_operands(&self, sep: char) -> Result<(&str, &str), Error> {
        if let Some((left, right)) = self.operands[0].split_once(sep) {
            if self.operands.len() != 1 {
                return Err(Error::Usage);
            }
            return Ok((left, right));
        }
        match self.operands.as_slice() {
            [left, right] => Ok((left.as_str(), right.as_str())),
            [left, _, right] => Ok((left.as_str(), right.as_str())),
            _ => Err(Error::Usage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn command(argv: &[&str]) -> Result<Command, Error> {
        Args::try_parse_from(argv.iter().copied()).unwrap().command()
    }

    #[test]
    fn describe_accepts_all_operand_forms() {
        let want = Command::Describe {
            net: Net::new(Ipv4Addr::new(192, 168, 1, 0), 24).unwrap(),
        };
        assert_eq!(command(&["ipcalc", "192.168.1.0/24"]).unwrap(), want);
        assert_eq!(command(&["ipcalc", "192.168.1.0", "24"]).unwrap(), want);
        assert_eq!(command(&["ipcalc", "192.168.1.0", "/", "24"]).unwrap(), want);
        assert_eq!(
            command(&["ipcalc", "192.168.1.0", "255.255.255.0"]).unwrap(),
            want
        );
    }

    #[test]
    fn describe_mask_takes_one_operand() {
        assert_eq!(
            command(&["ipcalc", "-n", "255.255.255.0"]).unwrap(),
            Command::DescribeMask {
                prefix_len: 24,
                mask: 0xffffff00
            }
        );
        assert_eq!(
            command(&["ipcalc", "-n", "255.255.255.0", "24"]),
            Err(Error::Usage)
        );
    }

    #[test]
    fn find_splits_on_colon() {
        let want = Command::Find {
            start: Ipv4Addr::new(10, 0, 0, 0),
            end: Ipv4Addr::new(10, 0, 0, 9),
        };
        assert_eq!(command(&["ipcalc", "-r", "10.0.0.0:10.0.0.9"]).unwrap(), want);
        assert_eq!(
            command(&["ipcalc", "-r", "10.0.0.0", ":", "10.0.0.9"]).unwrap(),
            want
        );
    }

    #[test]
    fn find_rejects_reversed_ranges() {
        assert_eq!(
            command(&["ipcalc", "-r", "10.0.0.9:10.0.0.0"]),
            Err(Error::InvalidRange("10.0.0.9:10.0.0.0".to_owned()))
        );
    }

    #[test]
    fn split_parses_the_capacity_list() {
        assert_eq!(
            command(&["ipcalc", "-s", "100,50,2", "192.168.1.0/24"]).unwrap(),
            Command::Split {
                net: Net::new(Ipv4Addr::new(192, 168, 1, 0), 24).unwrap(),
                capacities: vec![100, 50, 2],
            }
        );
    }

    #[test]
    fn combined_token_rules_out_extra_operands() {
        assert_eq!(command(&["ipcalc", "192.168.1.0/24", "24"]), Err(Error::Usage));
        assert_eq!(command(&["ipcalc", "192.168.1.0"]), Err(Error::Usage));
    }

    #[test]
    fn parse_errors_carry_the_offending_text() {
        assert_eq!(
            command(&["ipcalc", "zzz/24"]),
            Err(Error::InvalidAddress("zzz".to_owned()))
        );
        assert_eq!(
            command(&["ipcalc", "192.168.1.0/255.0.255.0"]),
            Err(Error::InvalidMaskDefinition("255.0.255.0".to_owned()))
        );
    }

    #[test]
    fn mode_flags_are_mutually_exclusive() {
        assert!(Args::try_parse_from(["ipcalc", "-n", "-r", "255.0.0.0"]).is_err());
        assert!(Args::try_parse_from(["ipcalc", "-n", "-s", "1", "255.0.0.0"]).is_err());
        assert!(Args::try_parse_from(["ipcalc", "-r", "-s", "1", "10.0.0.0:10.0.0.9"]).is_err());
    }

    #[test]
    fn operand_count_is_capped() {
        assert!(Args::try_parse_from(["ipcalc", "a", "b", "c", "d"]).is_err());
        assert!(Args::try_parse_from(["ipcalc"]).is_err());
    }
}
