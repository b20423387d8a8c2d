/// What happens to one named import from a mapped module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolRule {
    /// The symbol has no counterpart and is dropped.
    Remove,
    /// Same name, new module.
    Move(&'static str),
    /// New module, optionally renamed, optionally forced to a type-only import.
    Rename {
        /// Destination module.
        module: &'static str,
        /// New exported name, when it changes.
        name: Option<&'static str>,
        /// Overrides the type-only flag inherited from the original import.
        type_only: Option<bool>,
    },
}

/// Mapping entry for one origin module.
#[derive(Debug)]
pub struct ModuleRule {
    /// Exact origin module path.
    pub module: &'static str,
    /// Destination for symbols without a specific rule, and for default or
    /// namespace imports.
    pub fallback: Option<&'static str>,
    /// Per-symbol rules; these take precedence over `fallback`.
    pub symbols: &'static [(&'static str, SymbolRule)],
}

impl ModuleRule {
    /// Looks up the rule for an imported name.
    pub fn symbol(&self, name: &str) -> Option<SymbolRule> {
        self.symbols
            .iter()
            .find(|(symbol, _)| *symbol == name)
            .map(|(_, rule)| *rule)
    }
}

/// A package family whose sub-paths can be translated by prefix substitution.
#[derive(Debug)]
pub struct FamilyRule {
    /// Origin package prefix, e.g. `cosmjs-types`.
    pub prefix: &'static str,
    /// Destination package replacing the prefix.
    pub replacement: &'static str,
}

/// Static import mapping table, compiled into the binary.
#[derive(Debug)]
pub struct ImportTable {
    modules: &'static [ModuleRule],
    families: &'static [FamilyRule],
    scopes: &'static [&'static str],
}

impl ImportTable {
    /// The CosmJS to InterchainJS table.
    pub const fn cosmjs() -> Self {
        Self {
            modules: COSMJS_MODULES,
            families: COSMJS_FAMILIES,
            scopes: COSMJS_SCOPES,
        }
    }

    /// Builds a table from custom entries.
    pub const fn new(
        modules: &'static [ModuleRule],
        families: &'static [FamilyRule],
        scopes: &'static [&'static str],
    ) -> Self {
        Self {
            modules,
            families,
            scopes,
        }
    }

    /// Exact entry for `path`.
    pub fn module(&self, path: &str) -> Option<&ModuleRule> {
        self.modules.iter().find(|rule| rule.module == path)
    }

    /// Best-effort destination for a sub-path of a known family.
    ///
    /// `cosmjs-types/cosmos/bank/v1beta1/tx` becomes
    /// `@interchainjs/cosmos-types/cosmos/bank/v1beta1/tx`.
    pub fn family_path(&self, path: &str) -> Option<String> {
        self.families.iter().find_map(|family| {
            let rest = path.strip_prefix(family.prefix)?;
            (rest.is_empty() || rest.starts_with('/')).then(|| format!("{}{rest}", family.replacement))
        })
    }

    /// True when `path` belongs to a scope whose unmapped modules deserve a warning.
    pub fn in_migrated_scope(&self, path: &str) -> bool {
        self.scopes.iter().any(|scope| path.starts_with(scope))
    }
}

impl Default for ImportTable {
    fn default() -> Self {
        Self::cosmjs()
    }
}

const UTILS: &str = "@interchainjs/utils";
const COSMOS: &str = "@interchainjs/cosmos";
const COSMOS_UTILS: &str = "@interchainjs/cosmos/utils";
const AMINO: &str = "@interchainjs/amino";
const PUBKEY: &str = "@interchainjs/pubkey";
const BANK_QUERY: &str = "@interchainjs/cosmos-types/cosmos/bank/v1beta1/query";

const fn rename(module: &'static str, name: &'static str) -> SymbolRule {
    SymbolRule::Rename {
        module,
        name: Some(name),
        type_only: None,
    }
}

const fn type_only(module: &'static str) -> SymbolRule {
    SymbolRule::Rename {
        module,
        name: None,
        type_only: Some(true),
    }
}

const COSMJS_SCOPES: &[&str] = &["@cosmjs/"];

const COSMJS_FAMILIES: &[FamilyRule] = &[FamilyRule {
    prefix: "cosmjs-types",
    replacement: "@interchainjs/cosmos-types",
}];

const COSMJS_MODULES: &[ModuleRule] = &[
    ModuleRule {
        module: "@cosmjs/amino",
        fallback: Some(AMINO),
        symbols: &[],
    },
    ModuleRule {
        module: "@cosmjs/crypto",
        fallback: Some("@interchainjs/crypto"),
        symbols: &[],
    },
    ModuleRule {
        module: "@cosmjs/encoding",
        fallback: Some("@interchainjs/encoding"),
        symbols: &[],
    },
    ModuleRule {
        module: "@cosmjs/math",
        fallback: Some("@interchainjs/math"),
        symbols: &[],
    },
    ModuleRule {
        module: "@cosmjs/proto-signing",
        fallback: None,
        symbols: &[
            ("anyToSinglePubkey", SymbolRule::Move(PUBKEY)),
            ("decodeOptionalPubkey", SymbolRule::Move(PUBKEY)),
            ("decodePubkey", SymbolRule::Move(PUBKEY)),
            ("encodePubkey", SymbolRule::Move(PUBKEY)),
            (
                "DirectSecp256k1HdWallet",
                rename("@interchainjs/cosmos/wallets/secp256k1hd", "Secp256k1HDWallet"),
            ),
            ("makeSignDoc", SymbolRule::Remove),
        ],
    },
    ModuleRule {
        module: "@cosmjs/stargate",
        fallback: None,
        symbols: &[
            (
                "SigningStargateClient",
                rename("@interchainjs/cosmos/signing-client", "SigningClient"),
            ),
            (
                "StargateClient",
                rename("@interchainjs/cosmos/stargate-client", "QueryClient"),
            ),
            ("IndexedTx", SymbolRule::Move(COSMOS)),
            ("TimeoutError", SymbolRule::Move(COSMOS)),
            ("calculateFee", SymbolRule::Remove),
            ("GasPrice", SymbolRule::Remove),
            ("QueryClient", rename(COSMOS, "CosmosQueryClient")),
            (
                "setupAuthExtension",
                SymbolRule::Move("@interchainjs/cosmos/modules/auth/queries"),
            ),
            (
                "setupBankExtension",
                SymbolRule::Move("@interchainjs/cosmos/modules/bank/queries"),
            ),
            ("Attribute", type_only(UTILS)),
            ("Event", type_only(UTILS)),
            ("logs", rename(UTILS, "parseLogs")),
            ("parseRawLog", SymbolRule::Move(UTILS)),
            ("findAttribute", SymbolRule::Move(UTILS)),
            ("Log", type_only(UTILS)),
            ("assertIsDeliverTxFailure", SymbolRule::Move(COSMOS_UTILS)),
            ("assertIsDeliverTxSuccess", SymbolRule::Move(COSMOS_UTILS)),
            ("isDeliverTxFailure", SymbolRule::Move(COSMOS_UTILS)),
            ("isDeliverTxSuccess", SymbolRule::Move(COSMOS_UTILS)),
            ("DeliverTxResponse", type_only("@interchainjs/types")),
            ("AminoTypes", SymbolRule::Move(AMINO)),
            ("StdFee", type_only(AMINO)),
            ("parseCoins", SymbolRule::Move(AMINO)),
        ],
    },
    ModuleRule {
        module: "@cosmjs/utils",
        fallback: Some(UTILS),
        symbols: &[
            ("arrayContentStartsWith", rename(UTILS, "startsWithArray")),
            ("isNonNullObject", rename(UTILS, "isObjectLike")),
            ("assert", SymbolRule::Move(UTILS)),
            ("sleep", SymbolRule::Move(UTILS)),
            ("isUint8Array", SymbolRule::Move(UTILS)),
        ],
    },
    ModuleRule {
        module: "cosmjs-types",
        fallback: Some("@interchainjs/cosmos-types"),
        symbols: &[],
    },
    ModuleRule {
        module: "cosmjs-types/cosmos/bank/v1beta1/tx",
        fallback: None,
        symbols: &[("MsgSend", type_only("interchainjs/cosmos/bank/v1beta1/tx"))],
    },
    ModuleRule {
        module: "cosmjs-types/cosmos/bank/v1beta1/query",
        fallback: None,
        symbols: &[
            ("QueryBalanceRequest", type_only(BANK_QUERY)),
            ("QueryBalanceResponse", type_only(BANK_QUERY)),
        ],
    },
];
