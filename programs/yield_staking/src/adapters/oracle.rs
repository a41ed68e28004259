//! Chainlink OCR2 price feed reader.
//!
//! Reads the latest round straight from the aggregator account at fixed
//! offsets and rescales the answer to `PRICE_SCALE`.

use anchor_lang::prelude::*;

use crate::constants::MAX_PRICE_DECIMALS;
use crate::engine::{OraclePrice, ValueOracle};
use crate::error::StakingError;

const FEED_MIN_LEN: usize = 224;
const FEED_OFF_DECIMALS: usize = 138;
const FEED_OFF_TIMESTAMP: usize = 208;
const FEED_OFF_ANSWER: usize = 216;

/// Decimals of `PRICE_SCALE`.
const PRICE_DECIMALS: u32 = 8;

pub struct ChainlinkFeed<'info> {
    feed: AccountInfo<'info>,
}

impl<'info> ChainlinkFeed<'info> {
    pub fn new(feed: AccountInfo<'info>) -> Self {
        Self { feed }
    }
}

impl ValueOracle for ChainlinkFeed<'_> {
    fn latest_price(&self) -> Result<OraclePrice> {
        let data = self.feed.try_borrow_data()?;
        require!(
            data.len() >= FEED_MIN_LEN,
            StakingError::InvalidOracleAccount
        );

        let decimals = data[FEED_OFF_DECIMALS];
        let timestamp = read_u64(&data, FEED_OFF_TIMESTAMP)?;
        let answer = read_i128(&data, FEED_OFF_ANSWER)?;

        Ok(OraclePrice {
            price: normalize(answer, decimals)?,
            updated_at: i64::try_from(timestamp).map_err(|_| StakingError::InvalidOracleAccount)?,
        })
    }
}

/// Rescales a raw answer with `decimals` decimals to `PRICE_SCALE`.
pub fn normalize(answer: i128, decimals: u8) -> Result<u64> {
    require!(answer > 0, StakingError::InvalidPrice);
    require!(decimals <= MAX_PRICE_DECIMALS, StakingError::InvalidPrice);

    let raw = answer as u128;
    let decimals = decimals as u32;
    let scaled = if decimals >= PRICE_DECIMALS {
        raw / 10u128.pow(decimals - PRICE_DECIMALS)
    } else {
        raw.checked_mul(10u128.pow(PRICE_DECIMALS - decimals))
            .ok_or(StakingError::InvalidPrice)?
    };

    let price = u64::try_from(scaled).map_err(|_| StakingError::InvalidPrice)?;
    require!(price > 0, StakingError::InvalidPrice);

    Ok(price)
}

fn read_u64(data: &[u8], offset: usize) -> Result<u64> {
    let bytes: [u8; 8] = data
        .get(offset..offset + 8)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(StakingError::InvalidOracleAccount)?;
    Ok(u64::from_le_bytes(bytes))
}

fn read_i128(data: &[u8], offset: usize) -> Result<i128> {
    let bytes: [u8; 16] = data
        .get(offset..offset + 16)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(StakingError::InvalidOracleAccount)?;
    Ok(i128::from_le_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PRICE_SCALE;

    fn feed_data(answer: i128, decimals: u8, timestamp: u64) -> Vec<u8> {
        let mut data = vec![0u8; FEED_MIN_LEN];
        data[FEED_OFF_DECIMALS] = decimals;
        data[FEED_OFF_TIMESTAMP..FEED_OFF_TIMESTAMP + 8].copy_from_slice(&timestamp.to_le_bytes());
        data[FEED_OFF_ANSWER..FEED_OFF_ANSWER + 16].copy_from_slice(&answer.to_le_bytes());
        data
    }

    #[test]
    fn normalize_rescales_to_eight_decimals() {
        assert_eq!(normalize(2_000_00000000, 8).unwrap(), 2_000 * PRICE_SCALE);
        assert_eq!(normalize(2_000_000000, 6).unwrap(), 2_000 * PRICE_SCALE);
        assert_eq!(
            normalize(2_000_000000000000000000, 18).unwrap(),
            2_000 * PRICE_SCALE
        );
    }

    #[test]
    fn normalize_rejects_non_positive_and_vanishing_prices() {
        assert_eq!(normalize(0, 8).unwrap_err(), StakingError::InvalidPrice.into());
        assert_eq!(normalize(-5, 8).unwrap_err(), StakingError::InvalidPrice.into());
        assert_eq!(normalize(1, 18).unwrap_err(), StakingError::InvalidPrice.into());
        assert_eq!(normalize(1, 19).unwrap_err(), StakingError::InvalidPrice.into());
    }

    #[test]
    fn reads_latest_round_from_account_data() {
        let key = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let mut lamports = 0u64;
        let mut data = feed_data(1_234_50000000, 8, 1_700_000_000);
        let info = AccountInfo::new(&key, false, false, &mut lamports, &mut data, &owner, false, 0);

        let price = ChainlinkFeed::new(info).latest_price().unwrap();

        assert_eq!(
            price,
            OraclePrice {
                price: 1_234_50000000,
                updated_at: 1_700_000_000,
            }
        );
    }

    #[test]
    fn short_account_is_rejected() {
        let key = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let mut lamports = 0u64;
        let mut data = vec![0u8; FEED_MIN_LEN - 1];
        let info = AccountInfo::new(&key, false, false, &mut lamports, &mut data, &owner, false, 0);

        let err = ChainlinkFeed::new(info).latest_price().unwrap_err();

        assert_eq!(err, StakingError::InvalidOracleAccount.into());
    }
}
