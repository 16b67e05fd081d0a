//! Site characteristics and domain vocabularies
//!
//! router-switch.com specific constants plus the keyword tables the
//! extraction heuristics match against.

/// router-switch.com site constants
pub mod site {
    /// Site base URL
    pub const BASE_URL: &str = "https://www.router-switch.com";

    /// Landing page suffix for a category slug (`{base}/{slug}-price.html`)
    pub const CATEGORY_PAGE_SUFFIX: &str = "-price.html";

    /// The six fixed top-level categories (display name, slug)
    pub const ROOT_CATEGORIES: [(&str, &str); 6] = [
        ("Routers", "routers"),
        ("Switches", "switches"),
        ("Firewalls", "firewalls"),
        ("Wireless", "wireless"),
        ("Servers", "servers"),
        ("Storages", "storages"),
    ];

    /// Category slugs always probed during main category discovery
    pub const PATTERN_CATEGORY_SLUGS: [&str; 9] = [
        "routers",
        "switches",
        "firewalls",
        "wireless",
        "servers",
        "storages",
        "ip-phones",
        "accessories",
        "optical-network",
    ];

    /// Build the landing URL for a category slug
    pub fn category_url(base_url: &str, slug: &str) -> String {
        format!("{}/{}{}", base_url.trim_end_matches('/'), slug, CATEGORY_PAGE_SUFFIX)
    }
}

/// Brand recognition
pub mod brands {
    /// Fallback when no alias matches
    pub const GENERIC: &str = "Generic";

    /// Ordered alias table; the first alias contained in the lowercased text wins.
    /// `hpe` precedes `hp` so that HPE products are not reported as HP.
    pub const ALIASES: [(&str, &str); 29] = [
        ("cisco", "Cisco"),
        ("huawei", "Huawei"),
        ("juniper", "Juniper"),
        ("aruba", "Aruba"),
        ("netgear", "Netgear"),
        ("linksys", "Linksys"),
        ("dlink", "D-Link"),
        ("d-link", "D-Link"),
        ("tplink", "TP-Link"),
        ("tp-link", "TP-Link"),
        ("ubiquiti", "Ubiquiti"),
        ("mikrotik", "MikroTik"),
        ("dell", "Dell"),
        ("hpe", "HPE"),
        ("hp", "HP"),
        ("ibm", "IBM"),
        ("lenovo", "Lenovo"),
        ("supermicro", "Supermicro"),
        ("synology", "Synology"),
        ("qnap", "QNAP"),
        ("fortinet", "Fortinet"),
        ("palo alto", "Palo Alto"),
        ("checkpoint", "Check Point"),
        ("sophos", "Sophos"),
        ("watchguard", "WatchGuard"),
        ("sonicwall", "SonicWall"),
        ("microsoft", "Microsoft"),
        ("vmware", "VMware"),
        ("oracle", "Oracle"),
    ];

    /// Brands that start a new product inside a run-together text block
    pub const SPLIT_BRANDS: [&str; 6] = ["Cisco", "Huawei", "Dell", "HPE", "Juniper", "Aruba"];
}

/// Keyword lists used by the text and link heuristics
pub mod vocabulary {
    /// Page chrome that is never a product name
    pub const NAVIGATION_INDICATORS: [&str; 15] = [
        "shop by categories",
        "contact us",
        "track order",
        "express shipping",
        "javascript",
        "browser",
        "usd",
        "aud",
        "gbp",
        "english",
        "español",
        "router-switch.com",
        "disabled",
        "currency",
        "language",
    ];

    /// Words that mark a product name
    pub const PRODUCT_INDICATORS: [&str; 11] = [
        "router",
        "switch",
        "server",
        "firewall",
        "module",
        "card",
        "gateway",
        "access point",
        "storage",
        "memory",
        "software",
    ];

    /// Device words used by the single product check
    pub const DEVICE_WORDS: [&str; 4] = ["router", "switch", "server", "firewall"];

    /// href fragments that mark a product page link
    pub const PRODUCT_LINK_MARKERS: [&str; 7] =
        ["product", "item", "detail", "spec", "p/", "/p-", "catalog"];

    /// href fragments that exclude a link from category discovery
    pub const PRODUCT_HREF_EXCLUSIONS: [&str; 3] = ["product", "item", "detail"];

    /// Main category keywords (matched on href or link text)
    pub const MAIN_CATEGORY_KEYWORDS: [&str; 6] =
        ["routers", "switches", "firewalls", "wireless", "servers", "storages"];

    /// Subcategory keywords (matched on link text)
    pub const SUBCATEGORY_KEYWORDS: [&str; 6] =
        ["router", "switch", "server", "firewall", "wireless", "storage"];

    /// Brand words that mark a product type link
    pub const PRODUCT_TYPE_BRANDS: [&str; 6] = ["cisco", "huawei", "dell", "hpe", "juniper", "aruba"];

    /// Model family words that mark a product type link
    pub const PRODUCT_TYPE_MODELS: [&str; 5] =
        ["ar2200", "catalyst", "poweredge", "proliant", "netengine"];

    /// Image terms that disqualify an image
    pub const IMAGE_EXCLUDE_TERMS: [&str; 6] = ["icon", "logo", "button", "arrow", "menu", "nav"];

    /// Image terms that qualify an image
    pub const IMAGE_INCLUDE_TERMS: [&str; 6] =
        ["product", "router", "switch", "cisco", "huawei", "equipment"];
}

/// Values every record carries
pub mod record_defaults {
    pub const CONDITION: &str = "New";
    pub const AVAILABILITY: &str = "Check Availability";
    pub const WARRANTY: &str = "1 Year Limited Warranty";
    pub const CALL_FOR_PRICE_YES: &str = "Yes";
    pub const CALL_FOR_PRICE_NO: &str = "";

    /// Category path used when nothing can be inferred
    pub const DEFAULT_LEVEL1: &str = "Networking";
    pub const DEFAULT_LEVEL2: &str = "Network Equipment";
    pub const DEFAULT_LEVEL3: &str = "Network Equipment";
}

/// Size and range limits of the heuristics
pub mod limits {
    /// Product names shorter than this are rejected
    pub const MIN_NAME_CHARS: usize = 5;

    /// Product names longer than this are rejected
    pub const MAX_NAME_CHARS: usize = 150;

    /// Name prefix used for duplicate detection
    pub const DEDUP_PREFIX_CHARS: usize = 40;

    /// Characters searched on each side of a product mention for its price
    pub const PRICE_WINDOW_CHARS: usize = 500;

    /// Plausible price range (inclusive)
    pub const MIN_REASONABLE_PRICE: f64 = 10.0;
    pub const MAX_REASONABLE_PRICE: f64 = 500_000.0;

    /// Maximum names taken from one run-together text block
    pub const MAX_NAMES_PER_BLOCK: usize = 5;

    /// Split candidates outside this length range are dropped
    pub const MIN_SPLIT_NAME_CHARS: usize = 10;
    pub const MAX_SPLIT_NAME_CHARS: usize = 80;

    /// Single product heuristic length range
    pub const MIN_SINGLE_PRODUCT_CHARS: usize = 10;
    pub const MAX_SINGLE_PRODUCT_CHARS: usize = 100;

    /// Description fallback length
    pub const DESCRIPTION_FALLBACK_CHARS: usize = 50;

    /// Product page names must be longer than this
    pub const MIN_PAGE_NAME_CHARS: usize = 5;

    /// Sibling elements searched after a table row for a price
    pub const PRICE_SIBLING_LOOKAHEAD: usize = 3;

    /// Image src length that qualifies an image without a keyword
    pub const MIN_IMAGE_SRC_CHARS: usize = 20;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_url_joins_slug() {
        assert_eq!(
            site::category_url("https://www.router-switch.com/", "routers"),
            "https://www.router-switch.com/routers-price.html"
        );
    }

    #[test]
    fn hpe_alias_precedes_hp() {
        let hpe = brands::ALIASES.iter().position(|(alias, _)| *alias == "hpe");
        let hp = brands::ALIASES.iter().position(|(alias, _)| *alias == "hp");
        assert!(hpe < hp);
    }
}
