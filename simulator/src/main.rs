use axum::{extract::State, routing::get, Json, Router};
use era_stats::{NodeDirectoryResponse, NodeRecord};
use sp_core::crypto::{AccountId32, Ss58AddressFormat, Ss58Codec};
use std::error::Error;
use std::sync::Arc;

const ALICE_NODE_ID: &str = "0xd43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d";
const BOB_NODE_ID: &str = "0x8eaf04151687736326c9fea17e25fc5287613693c912909cb226aa4794f26a48";
const CHARLIE_NODE_ID: &str = "0x90b5ab205c6974c9ea841be688864633dc9ca8a357843eeacf2314649965fe22";
const DAVE_NODE_ID: &str = "0x306721211d5404bd9da88e0204360a1a9ab8b87c66c1bc2fcdd37f3c2222cc20";
const EVE_NODE_ID: &str = "0xe659a7a1628cdd93febc04a4e0646ea20e9f5f0ce097d9a05290d4a9e054df4e";

/// Local dev chains use the generic Substrate prefix.
const DEFAULT_SS58_PREFIX: u16 = 42;

fn get_all_nodes() -> Vec<(&'static str, &'static str, &'static str, &'static str)> {
    vec![
        ("Alice", ALICE_NODE_ID, "Europe", "online"),
        ("Bob", BOB_NODE_ID, "Europe", "online"),
        ("Charlie", CHARLIE_NODE_ID, "NorthAmerica", "online"),
        ("Dave", DAVE_NODE_ID, "NorthAmerica", "offline"),
        ("Eve", EVE_NODE_ID, "Asia", "not currently a validator"),
    ]
}

fn wallet_address(node_id: &str, prefix: u16) -> Result<String, Box<dyn Error>> {
    let account: AccountId32 = node_id.parse()?;
    Ok(account.to_ss58check_with_version(Ss58AddressFormat::custom(prefix)))
}

fn build_directory(prefix: u16) -> NodeDirectoryResponse {
    let mut nodes = Vec::new();
    for (name, node_id, geo_bin, status) in get_all_nodes() {
        let address = match wallet_address(node_id, prefix) {
            Ok(address) => address,
            Err(e) => {
                eprintln!("Failed to derive wallet address for {}: {}", name, e);
                continue;
            }
        };

        println!("  {} ({}): {} [{}]", name, address, geo_bin, status);
        nodes.push(NodeRecord::new(&address, geo_bin, status));
    }

    NodeDirectoryResponse { nodes }
}

async fn get_nodes(State(directory): State<Arc<NodeDirectoryResponse>>) -> Json<NodeDirectoryResponse> {
    println!("📍 Node directory request, returning {} nodes", directory.nodes.len());
    Json(directory.as_ref().clone())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    println!("Starting Node Directory Simulator...\n");

    let prefix = std::env::var("SS58_PREFIX")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(DEFAULT_SS58_PREFIX);
    let directory = Arc::new(build_directory(prefix));

    let app = Router::new()
        .route("/v1/nodes", get(get_nodes))
        .with_state(directory);

    // Get the server port from environment or use default
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{}", port);

    println!("\nServer listening on http://{}", addr);
    println!("Access the node directory at: http://{}/v1/nodes\n", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dev_accounts_render_as_wallet_addresses() {
        assert_eq!(
            wallet_address(ALICE_NODE_ID, 42).unwrap(),
            "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY"
        );
        assert!(wallet_address("0x1234", 42).is_err());
    }

    #[test]
    fn directory_lists_every_node() {
        let directory = build_directory(42);
        assert_eq!(directory.nodes.len(), 5);
        assert!(directory.nodes.iter().all(|n| n.wallet_address.is_some()));
    }
}
