//! Whole-file migration scenarios through the public API.
#![cfg_attr(
    test,
    allow(
        dead_code,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        clippy::missing_errors_doc,
        clippy::tests_outside_test_module,
        reason = "Test allows"
    )
)]

use interchain_migrate::{
    Dialect, DiagnosticKind, Error, ErrorKind, ImportTable, ModuleRule, Pipeline, SymbolRule,
    TransformErrorKind, TransformOptions, parse, transform,
};
use swc_common::{GLOBALS, Globals};
use swc_ecma_ast::{ImportSpecifier, ModuleDecl, ModuleExportName, ModuleItem};

const COSMJS_SIGNING: &str = r#"
import { DirectSecp256k1HdWallet } from "@cosmjs/proto-signing";
import { GasPrice, SigningStargateClient, calculateFee } from "@cosmjs/stargate";
import type { MsgSend } from "cosmjs-types/cosmos/bank/v1beta1/tx";

const rpcEndpoint = "rpc.cosmos.network:26657";
const memo = "Sent via CosmJS";

async function send(mnemonic: string, recipient: string) {
    const signer = await DirectSecp256k1HdWallet.fromMnemonic(mnemonic, {
        prefix: "cosmos",
    });
    const [account] = await signer.getAccounts();
    const signingClient = await SigningStargateClient.connectWithSigner(rpcEndpoint, signer);

    const message: MsgSend = {
        fromAddress: account.address,
        toAddress: recipient,
        amount: [{ denom: "uatom", amount: "1000" }],
    };
    return signingClient.signAndBroadcast(
        account.address,
        [{ typeUrl: "/cosmos.bank.v1beta1.MsgSend", value: message }],
        calculateFee(200000, GasPrice.fromString("0.025uatom")),
        memo,
    );
}
"#;

fn squash(code: &str) -> String {
    code.chars().filter(|ch| !ch.is_whitespace()).collect()
}

fn normalize(code: &str) -> String {
    GLOBALS.set(&Globals::default(), || {
        parse("expected.ts", code, Dialect::TypeScript)
            .unwrap()
            .print()
            .unwrap()
    })
}

/// Text of a parsed string literal without its quotes.
fn unquote(raw: Option<&str>) -> String {
    let raw = raw.unwrap();
    raw[1..raw.len() - 1].to_owned()
}

/// `(module, imported names)` for every import declaration in `code`.
fn imports(code: &str) -> Vec<(String, bool, Vec<String>)> {
    let tree = parse("output.ts", code, Dialect::TypeScript).unwrap();
    tree.module()
        .body
        .iter()
        .filter_map(|item| match item {
            ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => Some(import),
            _ => None,
        })
        .map(|import| {
            let names = import
                .specifiers
                .iter()
                .map(|specifier| match specifier {
                    ImportSpecifier::Named(named) => match &named.imported {
                        Some(ModuleExportName::Ident(ident)) => ident.sym.to_string(),
                        Some(ModuleExportName::Str(name)) => unquote(name.raw.as_deref()),
                        None => named.local.sym.to_string(),
                    },
                    ImportSpecifier::Default(default) => format!("default {}", default.local.sym),
                    ImportSpecifier::Namespace(namespace) => format!("* {}", namespace.local.sym),
                })
                .collect();
            (unquote(import.src.raw.as_deref()), import.type_only, names)
        })
        .collect()
}

/// Tests the full signing flow in a single transform.
///
/// # Panics
/// Panics if any of the four rewrites is missing.
#[test]
fn test_signing_scenario_in_one_pass() {
    let migration = transform(COSMJS_SIGNING).unwrap();
    let code = squash(&migration.code);

    assert!(migration.changed);
    assert!(code.contains(
        r#"Secp256k1HDWallet.fromMnemonic(mnemonic,[{prefix:"cosmos",hdPath:"m/44'/118'/0'/0/0"}])"#
    ));
    assert!(code.contains(
        "SigningClient.connectWithSigner(rpcEndpoint,signer,{broadcast:{checkTx:true,deliverTx:true}})"
    ));
    assert!(code.contains("signingClient.signAndBroadcast(account.address,[message],/*TODO:"));
    assert!(code.contains("*/fee,memo)"));
    assert!(!code.contains("typeUrl"));
    assert!(!code.contains("calculateFee"));

    let imports = imports(&migration.code);
    assert_eq!(
        imports,
        vec![
            (
                "@interchainjs/cosmos/wallets/secp256k1hd".to_owned(),
                false,
                vec!["Secp256k1HDWallet".to_owned()]
            ),
            (
                "@interchainjs/cosmos/signing-client".to_owned(),
                false,
                vec!["SigningClient".to_owned()]
            ),
            (
                "interchainjs/cosmos/bank/v1beta1/tx".to_owned(),
                true,
                vec!["MsgSend".to_owned()]
            ),
        ]
    );
    assert!(migration.diagnostics.is_empty(), "{:?}", migration.diagnostics);

    // The output is valid input again.
    parse("migrated.ts", &migration.code, Dialect::TypeScript).unwrap();
}

/// Tests that already migrated code reports no change.
///
/// # Panics
/// Panics if the migration changes anything.
#[test]
fn test_migrated_code_is_left_alone() {
    let source = r#"
import { Secp256k1HDWallet } from "@interchainjs/cosmos/wallets/secp256k1hd";
import { SigningClient } from "@interchainjs/cosmos/signing-client";

export async function connect(mnemonic: string) {
    const wallet = Secp256k1HDWallet.fromMnemonic(mnemonic, [{ prefix: "cosmos", hdPath: "m/44'/118'/0'/0/0" }]);
    return SigningClient.connectWithSigner(rpc, wallet, { broadcast: { checkTx: true, deliverTx: true } });
}
"#;
    let migration = transform(source).unwrap();

    assert!(!migration.changed);
    assert!(migration.diagnostics.is_empty());
    assert_eq!(migration.code, normalize(source));
}

/// Tests that each mapped symbol is moved away from its CosmJS module.
///
/// # Panics
/// Panics if a mapped symbol stays behind.
#[test]
fn test_every_mapped_symbol_leaves_its_module() {
    let cases = [
        ("@cosmjs/proto-signing", "encodePubkey", "@interchainjs/pubkey"),
        ("@cosmjs/stargate", "StargateClient", "@interchainjs/cosmos/stargate-client"),
        ("@cosmjs/stargate", "setupBankExtension", "@interchainjs/cosmos/modules/bank/queries"),
        ("@cosmjs/stargate", "assertIsDeliverTxSuccess", "@interchainjs/cosmos/utils"),
        ("@cosmjs/stargate", "parseCoins", "@interchainjs/amino"),
        ("@cosmjs/encoding", "toBech32", "@interchainjs/encoding"),
        ("@cosmjs/math", "Decimal", "@interchainjs/math"),
        ("@cosmjs/crypto", "sha256", "@interchainjs/crypto"),
        ("@cosmjs/utils", "sleep", "@interchainjs/utils"),
    ];

    for (origin, symbol, destination) in cases {
        let source = format!("import {{ {symbol} }} from \"{origin}\";\nuse({symbol});\n");
        let migration = transform(&source).unwrap();
        let imports = imports(&migration.code);

        assert!(
            imports.iter().all(|(module, _, _)| module != origin),
            "{symbol} still imported from {origin}"
        );
        let targets: Vec<_> = imports
            .iter()
            .filter(|(module, _, names)| module == destination && !names.is_empty())
            .collect();
        assert_eq!(targets.len(), 1, "{symbol} -> {destination}: {imports:?}");
    }
}

/// Tests that imports bound for one module collapse into one declaration.
///
/// # Panics
/// Panics if the destination appears twice.
#[test]
fn test_declarations_sharing_a_destination_are_merged() {
    let source = r#"
import { IndexedTx, isDeliverTxSuccess } from "@cosmjs/stargate";
import { sha256 } from "@cosmjs/crypto";
import { TimeoutError, IndexedTx as Indexed } from "@cosmjs/stargate";
"#;
    let migration = transform(source).unwrap();
    let imports = imports(&migration.code);

    let cosmos: Vec<_> = imports
        .iter()
        .filter(|(module, _, _)| module == "@interchainjs/cosmos")
        .collect();
    assert_eq!(cosmos.len(), 1);
    assert_eq!(
        cosmos[0].2,
        vec!["IndexedTx".to_owned(), "TimeoutError".to_owned(), "IndexedTx".to_owned()]
    );
}

/// Tests that look-alike calls with other shapes are left alone.
///
/// # Panics
/// Panics if the code changes.
#[test]
fn test_non_matching_shapes_are_untouched() {
    let source = r#"
const a = DirectSecp256k1HdWallet.fromMnemonic(mnemonic, options);
const b = SigningStargateClient.connectWithSigner(rpc, signer, { gasPrice });
const c = client.signAndBroadcast(sender, [msg], fee);
const d = signingClient.signAndBroadcast(sender, [msg]);
"#;
    let migration = transform(source).unwrap();

    assert!(!migration.changed);
    assert_eq!(migration.code, normalize(source));
}

/// Tests that warnings are returned next to the output, in order.
///
/// # Panics
/// Panics if output is missing or diagnostics lack locations.
#[test]
fn test_diagnostics_do_not_block_output() {
    let source = r#"
import { coins, makeCosmoshubPath } from "@cosmjs/proto-signing";
import { FaucetClient } from "@cosmjs/faucet-client";
import { MsgDelegate } from "cosmjs-types/cosmos/staking/v1beta1/tx";
signingClient.signAndBroadcast(sender, messages, fee);
"#;
    let migration = transform(source).unwrap();
    let kinds: Vec<_> = migration
        .diagnostics
        .iter()
        .map(|diagnostic| diagnostic.kind)
        .collect();

    assert_eq!(
        kinds,
        vec![
            DiagnosticKind::UnmappedSymbol,
            DiagnosticKind::UnmappedSymbol,
            DiagnosticKind::UnmappedModule,
            DiagnosticKind::HeuristicPath,
            DiagnosticKind::BroadcastNotRewritten,
        ]
    );
    assert!(migration.changed);
    assert!(
        migration
            .diagnostics
            .iter()
            .all(|diagnostic| diagnostic.location.is_some())
    );
}

/// Tests that conflicting default imports abort the transform.
///
/// # Panics
/// Panics if the error is not an import rule conflict on line 3.
#[test]
fn test_conflicting_defaults_abort() {
    let source = r#"
import amino from "@cosmjs/amino";
import Amino from "@cosmjs/amino";
"#;
    let err = transform(source).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transform);

    let Error::Transform(err) = err else {
        panic!("expected a transform error");
    };
    assert_eq!(err.rule, "import");
    assert!(matches!(err.kind, TransformErrorKind::DefaultImportConflict { .. }));
    assert_eq!(err.location.map(|location| location.line), Some(3));
}

/// Tests that invalid input is a located parse error.
///
/// # Panics
/// Panics if the error kind or location is wrong.
#[test]
fn test_parse_error_is_reported() {
    let err = transform("import { DirectSecp256k1HdWallet from \"@cosmjs/proto-signing\";\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(err.location().is_some());
}

/// Tests a pipeline built on a caller-supplied table.
///
/// # Panics
/// Panics if the imports or diagnostics differ.
#[test]
fn test_custom_table() {
    static MODULES: &[ModuleRule] = &[ModuleRule {
        module: "@legacy/sdk",
        fallback: None,
        symbols: &[("Client", SymbolRule::Move("@modern/sdk"))],
    }];
    static TABLE: ImportTable = ImportTable::new(MODULES, &[], &["@legacy/"]);

    let migration = Pipeline::new(&TABLE)
        .run(
            "import { Client } from \"@legacy/sdk\";\nimport { Other } from \"@legacy/other\";\n",
            &TransformOptions::default(),
        )
        .unwrap();

    assert_eq!(
        imports(&migration.code),
        vec![
            ("@modern/sdk".to_owned(), false, vec!["Client".to_owned()]),
            ("@legacy/other".to_owned(), false, vec!["Other".to_owned()]),
        ]
    );
    assert_eq!(migration.diagnostics.len(), 1);
    assert_eq!(migration.diagnostics[0].kind, DiagnosticKind::UnmappedModule);
}

/// Tests that a value import and a type-only import of the same binding
/// become a single value import.
///
/// # Panics
/// Panics if the binding is duplicated or stays type-only.
#[test]
fn test_value_import_absorbs_type_only_duplicate() {
    let migration = transform(
        r#"
import { type IndexedTx } from "@cosmjs/stargate";
import { IndexedTx } from "@cosmjs/stargate";

export function height(tx: IndexedTx): number {
    return tx.height;
}
"#,
    )
    .unwrap();

    assert_eq!(
        imports(&migration.code),
        vec![("@interchainjs/cosmos".to_owned(), false, vec!["IndexedTx".to_owned()])]
    );
    assert!(!migration.code.contains("type IndexedTx"));
}

/// Tests that transforms running on several threads at once do not
/// interfere with each other.
///
/// # Panics
/// Panics if any thread fails or returns another thread's output.
#[test]
fn test_concurrent_transforms_are_independent() {
    let sources: Vec<String> = (0..8)
        .map(|index| {
            format!(
                "import {{ SigningStargateClient }} from \"@cosmjs/stargate\";\n\
                 export const client{index} = SigningStargateClient.connectWithSigner(rpc{index}, signer);\n"
            )
        })
        .collect();

    let migrations: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = sources
            .iter()
            .map(|source| scope.spawn(|| transform(source)))
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    for (index, migration) in migrations.into_iter().enumerate() {
        let migration = migration.unwrap();
        assert!(migration.changed);
        assert!(migration.code.contains(&format!("client{index}")));
        assert!(migration.code.contains(&format!("rpc{index}")));
        assert_eq!(
            imports(&migration.code),
            vec![(
                "@interchainjs/cosmos/signing-client".to_owned(),
                false,
                vec!["SigningClient".to_owned()]
            )]
        );
    }
}

/// Tests that input nested too deeply for the parser fails cleanly.
///
/// # Panics
/// Panics if the input is accepted or the error is not a depth error.
#[test]
fn test_deeply_nested_input_is_rejected() {
    let source = format!("const v = {}1{};", "(".repeat(1000), ")".repeat(1000));
    let Err(Error::Transform(err)) = transform(&source) else {
        panic!("expected a transform error");
    };
    assert_eq!(err.kind, TransformErrorKind::DepthExceeded { limit: 512 });
}
