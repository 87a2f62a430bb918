use crate::gateway::{GatewayError, LedgerContract};
use crate::models::asset::Asset;

const READ_ASSET: &str = "ReadAsset";
const CREATE_ASSET: &str = "CreateAsset";

pub async fn read_asset_from_ledger(
    contract: &dyn LedgerContract,
    dealer_id: &str,
) -> Result<Vec<u8>, GatewayError> {
    log::info!("Querying ledger for asset with dealer id: {}", dealer_id);
    contract
        .evaluate_transaction(READ_ASSET, &[dealer_id.to_string()])
        .await
}

pub async fn create_asset_on_ledger(
    contract: &dyn LedgerContract,
    asset: &Asset,
) -> Result<(), GatewayError> {
    log::info!("Creating asset for dealer id: {}", asset.dealer_id);
    contract
        .submit_transaction(CREATE_ASSET, &asset.to_args())
        .await
}
