// Vendor nation registry: alpha-3 codes mapped to the numeric entity ids
// used in league filters. Includes the vendor's non-ISO entries (home
// nations, continents, historical codes).

/// A nation known to the vendor entity framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Nation {
    code: &'static str,
    id: i64,
}

impl Nation {
    /// Alpha-3 code as used in `NationCode` query parameters.
    pub fn code(self) -> &'static str {
        self.code
    }

    /// Numeric entity id as used in `NationIds` query parameters.
    pub fn id(self) -> i64 {
        self.id
    }

    /// Look up a nation by alpha-3 code, case-insensitively.
    pub fn from_code(code: &str) -> Option<Nation> {
        NATIONS
            .iter()
            .find(|(c, _)| c.eq_ignore_ascii_case(code))
            .map(|&(code, id)| Nation { code, id })
    }

    /// Look up a nation by vendor entity id.
    pub fn from_id(id: i64) -> Option<Nation> {
        NATIONS
            .iter()
            .find(|&&(_, i)| i == id)
            .map(|&(code, id)| Nation { code, id })
    }
}

static NATIONS: &[(&str, i64)] = &[
    ("AFG", 1),
    ("ALA", 2),
    ("ALB", 3),
    ("DZA", 4),
    ("ASM", 5),
    ("AND", 6),
    ("AGO", 7),
    ("AIA", 8),
    ("AN", 9),
    ("ATG", 10),
    ("ARG", 11),
    ("ARM", 12),
    ("ABW", 13),
    ("AUS", 14),
    ("AUT", 15),
    ("AZE", 16),
    ("BHS", 17),
    ("BHR", 18),
    ("BGD", 19),
    ("BRB", 20),
    ("BLR", 21),
    ("BEL", 22),
    ("BLZ", 23),
    ("BEN", 24),
    ("BMU", 25),
    ("BTN", 26),
    ("BOL", 27),
    ("BES", 28),
    ("BIH", 29),
    ("BWA", 30),
    ("BVT", 31),
    ("BRA", 32),
    ("IOT", 33),
    ("UMI", 34),
    ("VGB", 35),
    ("VIR", 36),
    ("BRN", 37),
    ("BGR", 38),
    ("BFA", 39),
    ("BDI", 40),
    ("KHM", 41),
    ("CMR", 42),
    ("CAN", 43),
    ("CPV", 44),
    ("CYM", 45),
    ("CAF", 46),
    ("TCD", 47),
    ("CHL", 48),
    ("CHN", 49),
    ("CXR", 50),
    ("CCK", 51),
    ("COL", 52),
    ("COM", 53),
    ("COG", 54),
    ("COD", 55),
    ("COK", 56),
    ("CRI", 57),
    ("HRV", 58),
    ("CUB", 59),
    ("CUW", 60),
    ("CYP", 61),
    ("CZE", 62),
    ("DNK", 63),
    ("DJI", 64),
    ("DMA", 65),
    ("DOM", 66),
    ("ECU", 67),
    ("EGY", 68),
    ("SLV", 69),
    ("GNQ", 70),
    ("ERI", 71),
    ("EST", 72),
    ("ETH", 73),
    ("FLK", 74),
    ("FRO", 75),
    ("FJI", 76),
    ("FIN", 77),
    ("FRA", 78),
    ("GUF", 79),
    ("PYF", 80),
    ("ATF", 81),
    ("GAB", 82),
    ("GMB", 83),
    ("GEO", 84),
    ("DEU", 85),
    ("GHA", 86),
    ("GIB", 87),
    ("GRC", 88),
    ("GRL", 89),
    ("GRD", 90),
    ("GLP", 91),
    ("GUM", 92),
    ("GTM", 93),
    ("GGY", 94),
    ("GIN", 95),
    ("GNB", 96),
    ("GUY", 97),
    ("HTI", 98),
    ("HMD", 99),
    ("VAT", 100),
    ("HND", 101),
    ("HKG", 102),
    ("HUN", 103),
    ("ISL", 104),
    ("IND", 105),
    ("IDN", 106),
    ("CIV", 107),
    ("IRN", 108),
    ("IRQ", 109),
    ("IRL", 110),
    ("IMN", 111),
    ("ISR", 112),
    ("ITA", 113),
    ("JAM", 114),
    ("JPN", 115),
    ("JEY", 116),
    ("JOR", 117),
    ("KAZ", 118),
    ("KEN", 119),
    ("KIR", 120),
    ("KWT", 121),
    ("KGZ", 122),
    ("LAO", 123),
    ("LVA", 124),
    ("LBN", 125),
    ("LSO", 126),
    ("LBR", 127),
    ("LBY", 128),
    ("LIE", 129),
    ("LTU", 130),
    ("LUX", 131),
    ("MAC", 132),
    ("MKD", 133),
    ("MDG", 134),
    ("MWI", 135),
    ("MYS", 136),
    ("MDV", 137),
    ("MLI", 138),
    ("MLT", 139),
    ("MHL", 140),
    ("MTQ", 141),
    ("MRT", 142),
    ("MUS", 143),
    ("MYT", 144),
    ("MEX", 145),
    ("FSM", 146),
    ("MDA", 147),
    ("MCO", 148),
    ("MNG", 149),
    ("MNE", 150),
    ("MSR", 151),
    ("MAR", 152),
    ("MOZ", 153),
    ("MMR", 154),
    ("NAM", 155),
    ("NRU", 156),
    ("NPL", 157),
    ("NLD", 158),
    ("NCL", 159),
    ("NZL", 160),
    ("NIC", 161),
    ("NER", 162),
    ("NGA", 163),
    ("NIU", 164),
    ("NFK", 165),
    ("PRK", 166),
    ("MNP", 167),
    ("NOR", 168),
    ("OMN", 169),
    ("PAK", 170),
    ("PLW", 171),
    ("PSE", 172),
    ("PAN", 173),
    ("PNG", 174),
    ("PRY", 175),
    ("PER", 176),
    ("PHL", 177),
    ("PCN", 178),
    ("POL", 179),
    ("PRT", 180),
    ("PRI", 181),
    ("QAT", 182),
    ("KOS", 183),
    ("REU", 184),
    ("ROU", 185),
    ("RUS", 186),
    ("RWA", 187),
    ("BLM", 188),
    ("SHN", 189),
    ("KNA", 190),
    ("LCA", 191),
    ("MAF", 192),
    ("SPM", 193),
    ("VCT", 194),
    ("WSM", 195),
    ("SMR", 196),
    ("STP", 197),
    ("SAU", 198),
    ("SEN", 199),
    ("SRB", 200),
    ("SYC", 201),
    ("SLE", 202),
    ("SGP", 203),
    ("SXM", 204),
    ("SVK", 205),
    ("SVN", 206),
    ("SLB", 207),
    ("SOM", 208),
    ("ZAF", 209),
    ("SGS", 210),
    ("KOR", 211),
    ("SSD", 212),
    ("ESP", 213),
    ("LKA", 214),
    ("SDN", 215),
    ("SUR", 216),
    ("SJM", 217),
    ("SWZ", 218),
    ("SWE", 219),
    ("CHE", 220),
    ("SYR", 221),
    ("TWN", 222),
    ("TJK", 223),
    ("TZA", 224),
    ("THA", 225),
    ("TLS", 226),
    ("TGO", 227),
    ("TKL", 228),
    ("TON", 229),
    ("TTO", 230),
    ("TUN", 231),
    ("TUR", 232),
    ("TKM", 233),
    ("TCA", 234),
    ("TUV", 235),
    ("UGA", 236),
    ("UKR", 237),
    ("ARE", 238),
    ("GBR", 239),
    ("USA", 240),
    ("URY", 241),
    ("UZB", 242),
    ("VUT", 243),
    ("VEN", 244),
    ("VNM", 245),
    ("WLF", 246),
    ("ESH", 247),
    ("YEM", 248),
    ("ZMB", 249),
    ("ZWE", 250),
    ("EU", 251),
    ("AS", 252),
    ("AF", 253),
    ("OC", 254),
    ("NA", 256),
    ("SA", 257),
    ("SCO", 258),
    ("ENG", 259),
    ("WAL", 260),
    ("NIR", 261),
    ("WO", 263),
    ("ANT", 266),
    ("ZAR", 267),
];
