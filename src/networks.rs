//! Card networks and their prefix/length signatures
//!
//! A number belongs to a network when it starts with one of the network's
//! prefixes and its digit count is one of the network's lengths. Prefixes
//! overlap between networks (DISCOVER and UNIONPAY share the 622 ranges), so
//! a number may belong to more than one.

use std::fmt;

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::normalize::NormalizedDigits;

/// Known card networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Network {
    AmericanExpress,
    DinersClub,
    DinersClubUs,
    Discover,
    Jcb,
    Laser,
    Maestro,
    Mastercard,
    Solo,
    Unionpay,
    Visa,
}

impl Network {
    pub const ALL: [Network; 11] = [
        Network::AmericanExpress,
        Network::DinersClub,
        Network::DinersClubUs,
        Network::Discover,
        Network::Jcb,
        Network::Laser,
        Network::Maestro,
        Network::Mastercard,
        Network::Solo,
        Network::Unionpay,
        Network::Visa,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Network::AmericanExpress => "AMERICAN_EXPRESS",
            Network::DinersClub => "DINERS_CLUB",
            Network::DinersClubUs => "DINERS_CLUB_US",
            Network::Discover => "DISCOVER",
            Network::Jcb => "JCB",
            Network::Laser => "LASER",
            Network::Maestro => "MAESTRO",
            Network::Mastercard => "MASTERCARD",
            Network::Solo => "SOLO",
            Network::Unionpay => "UNIONPAY",
            Network::Visa => "VISA",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepted lengths and prefixes for one network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkSpec {
    pub network: Network,
    pub lengths: &'static [usize],
    pub prefixes: &'static [&'static str],
}

impl NetworkSpec {
    /// Direct check of one network's signature against the digits.
    pub fn accepts(&self, digits: &str) -> bool {
        self.lengths.contains(&digits.len()) && self.prefixes.iter().any(|p| digits.starts_with(p))
    }
}

// China UnionPay ranges, also honoured by DISCOVER.
macro_rules! unionpay_prefixes {
    ($($extra:literal),* $(,)?) => {
        &[
            $($extra,)*
            "622126", "622127", "622128", "622129",
            "62213", "62214", "62215", "62216", "62217", "62218", "62219",
            "6222", "6223", "6224", "6225", "6226", "6227", "6228",
            "62290", "62291",
            "622920", "622921", "622922", "622923", "622924", "622925",
        ]
    };
}

const JCB_PREFIXES: &[&str] = &["3528", "3529", "353", "354", "355", "356", "357", "358"];

static NETWORKS: [NetworkSpec; 11] = [
    NetworkSpec {
        network: Network::AmericanExpress,
        lengths: &[15],
        prefixes: &["34", "37"],
    },
    NetworkSpec {
        network: Network::DinersClub,
        lengths: &[14],
        prefixes: &["300", "301", "302", "303", "304", "305", "36"],
    },
    NetworkSpec {
        network: Network::DinersClubUs,
        lengths: &[16],
        prefixes: &["54", "55"],
    },
    NetworkSpec {
        network: Network::Discover,
        lengths: &[16],
        prefixes: unionpay_prefixes!["6011", "644", "645", "646", "647", "648", "649", "65"],
    },
    NetworkSpec {
        network: Network::Jcb,
        lengths: &[16],
        prefixes: JCB_PREFIXES,
    },
    NetworkSpec {
        network: Network::Laser,
        lengths: &[16, 17, 18, 19],
        prefixes: JCB_PREFIXES,
    },
    NetworkSpec {
        network: Network::Maestro,
        lengths: &[12, 13, 14, 15, 16, 17, 18, 19],
        prefixes: &[
            "5018", "5020", "5038", "6304", "6759", "6761", "6762", "6763", "6764", "6765", "6766",
        ],
    },
    NetworkSpec {
        network: Network::Mastercard,
        lengths: &[16],
        prefixes: &["51", "52", "53", "54", "55"],
    },
    NetworkSpec {
        network: Network::Solo,
        lengths: &[16, 18, 19],
        prefixes: &["6334", "6767"],
    },
    NetworkSpec {
        network: Network::Unionpay,
        lengths: &[16, 17, 18, 19],
        prefixes: unionpay_prefixes![],
    },
    NetworkSpec {
        network: Network::Visa,
        lengths: &[16],
        prefixes: &["4"],
    },
];

/// The network table, in the order networks are reported.
pub fn networks() -> &'static [NetworkSpec] {
    &NETWORKS
}

/// Longest prefix in the table. Only this many leading digits are searched.
const MAX_PREFIX_LEN: usize = 6;

/// Every distinct prefix compiled into one automaton, each pattern mapped
/// back to the table entries that list it.
struct PrefixIndex {
    automaton: AhoCorasick,
    owners: Vec<Vec<usize>>,
}

impl PrefixIndex {
    fn build() -> Self {
        let mut patterns: Vec<&'static str> = Vec::new();
        let mut owners: Vec<Vec<usize>> = Vec::new();

        for (idx, spec) in NETWORKS.iter().enumerate() {
            for &prefix in spec.prefixes {
                match patterns.iter().position(|&p| p == prefix) {
                    Some(pid) => owners[pid].push(idx),
                    None => {
                        patterns.push(prefix);
                        owners.push(vec![idx]);
                    }
                }
            }
        }

        let automaton = AhoCorasick::new(&patterns).unwrap();
        Self { automaton, owners }
    }

    /// Table indices of every network accepting `digits`, unordered and
    /// possibly repeated when two prefixes of one network both match.
    fn accepting<'a>(&'a self, digits: &'a str) -> impl Iterator<Item = usize> + 'a {
        let head = &digits[..digits.len().min(MAX_PREFIX_LEN)];

        self.automaton
            .find_overlapping_iter(head)
            .filter(|m| m.start() == 0)
            .flat_map(move |m| self.owners[m.pattern().as_usize()].iter().copied())
            .filter(move |&idx| NETWORKS[idx].lengths.contains(&digits.len()))
    }
}

static INDEX: Lazy<PrefixIndex> = Lazy::new(PrefixIndex::build);

/// True if any known network accepts the digits' prefix and length.
pub fn matches_known_network(digits: &NormalizedDigits<'_>) -> bool {
    first_match(digits).is_some()
}

/// First network, in table order, that accepts the digits.
pub fn first_match(digits: &NormalizedDigits<'_>) -> Option<Network> {
    INDEX
        .accepting(digits.as_str())
        .min()
        .map(|idx| NETWORKS[idx].network)
}

/// Every network that accepts the digits, in table order.
pub fn matching_networks(digits: &NormalizedDigits<'_>) -> Vec<Network> {
    let mut found: Vec<usize> = INDEX.accepting(digits.as_str()).collect();
    found.sort_unstable();
    found.dedup();
    found.into_iter().map(|idx| NETWORKS[idx].network).collect()
}
