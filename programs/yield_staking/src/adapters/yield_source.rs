//! CPI adapter for the yield reserve program.
//!
//! The reserve takes lamports from the custody PDA and mints proxy tokens
//! into the pool's proxy vault (`deposit`), burns proxy tokens and returns
//! lamports to custody (`redeem`). Both are Anchor instructions addressed by
//! their `global:<name>` sighash. Amounts received are measured from the
//! balance change around each CPI rather than trusted from return data.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::hash::hash;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_lang::solana_program::program::invoke_signed;
use anchor_spl::token::TokenAccount;

use crate::constants::{CUSTODY_SEED, EXCHANGE_RATE_SCALE};
use crate::engine::{YieldRate, YieldSource};
use crate::error::StakingError;

const DEPOSIT_IX: &[u8] = b"global:deposit";
const REDEEM_IX: &[u8] = b"global:redeem";

/// Borsh layout of the reserve account after its 8-byte discriminator.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct YieldReserveState {
    pub liquidity_mint: Pubkey,
    pub total_liquidity: u64,
    pub proxy_supply: u64,
}

impl YieldReserveState {
    pub fn unpack(data: &[u8]) -> Result<Self> {
        let mut body = data.get(8..).ok_or(StakingError::InvalidYieldReserve)?;
        Self::deserialize(&mut body).map_err(|_| error!(StakingError::InvalidYieldReserve))
    }

    /// Lamports per proxy unit, scaled by `EXCHANGE_RATE_SCALE`.
    pub fn exchange_rate(&self) -> Result<u128> {
        if self.proxy_supply == 0 {
            return Ok(EXCHANGE_RATE_SCALE);
        }

        Ok((self.total_liquidity as u128)
            .checked_mul(EXCHANGE_RATE_SCALE)
            .ok_or(StakingError::MathOverflow)?
            / self.proxy_supply as u128)
    }
}

/// Read-only view of the reserve, for instructions that settle but never
/// deposit or redeem.
pub struct ReserveRate<'info> {
    pub program: AccountInfo<'info>,
    pub reserve: AccountInfo<'info>,
}

impl YieldRate for ReserveRate<'_> {
    fn exchange_rate(&self) -> Result<u128> {
        read_exchange_rate(&self.program, &self.reserve)
    }
}

fn read_exchange_rate(program: &AccountInfo, reserve: &AccountInfo) -> Result<u128> {
    require_keys_eq!(*reserve.owner, program.key(), StakingError::InvalidYieldReserve);
    let data = reserve.try_borrow_data()?;
    YieldReserveState::unpack(&data)?.exchange_rate()
}

pub struct CpiYieldSource<'info> {
    pub program: AccountInfo<'info>,
    pub reserve: AccountInfo<'info>,
    pub liquidity_vault: AccountInfo<'info>,
    pub proxy_mint: AccountInfo<'info>,
    pub proxy_vault: AccountInfo<'info>,
    pub custody: AccountInfo<'info>,
    pub token_program: AccountInfo<'info>,
    pub system_program: AccountInfo<'info>,
    pub stake_pool: Pubkey,
    pub custody_bump: u8,
}

impl<'info> CpiYieldSource<'info> {
    fn invoke_reserve(&self, name: &[u8], amount: u64) -> Result<()> {
        let mut data = hash(name).to_bytes()[..8].to_vec();
        data.extend_from_slice(&amount.to_le_bytes());

        let ix = Instruction {
            program_id: self.program.key(),
            accounts: vec![
                AccountMeta::new(self.custody.key(), true),
                AccountMeta::new(self.reserve.key(), false),
                AccountMeta::new(self.liquidity_vault.key(), false),
                AccountMeta::new(self.proxy_mint.key(), false),
                AccountMeta::new(self.proxy_vault.key(), false),
                AccountMeta::new_readonly(self.token_program.key(), false),
                AccountMeta::new_readonly(self.system_program.key(), false),
            ],
            data,
        };

        let seeds: &[&[u8]] = &[
            CUSTODY_SEED,
            self.stake_pool.as_ref(),
            &[self.custody_bump],
        ];
        invoke_signed(
            &ix,
            &[
                self.custody.clone(),
                self.reserve.clone(),
                self.liquidity_vault.clone(),
                self.proxy_mint.clone(),
                self.proxy_vault.clone(),
                self.token_program.clone(),
                self.system_program.clone(),
                self.program.clone(),
            ],
            &[seeds],
        )?;

        Ok(())
    }

    fn proxy_balance(&self) -> Result<u64> {
        let data = self.proxy_vault.try_borrow_data()?;
        let vault = TokenAccount::try_deserialize(&mut &data[..])?;
        Ok(vault.amount)
    }
}

impl YieldSource for CpiYieldSource<'_> {
    fn wrap(&mut self, amount: u64) -> Result<u64> {
        let before = self.proxy_balance()?;
        self.invoke_reserve(DEPOSIT_IX, amount)?;
        let after = self.proxy_balance()?;

        let minted = after.checked_sub(before).ok_or(StakingError::Underflow)?;
        msg!("Wrapped {} lamports into {} proxy units", amount, minted);
        Ok(minted)
    }

    fn unwrap(&mut self, proxy_amount: u64) -> Result<u64> {
        let before = self.custody.lamports();
        self.invoke_reserve(REDEEM_IX, proxy_amount)?;
        let after = self.custody.lamports();

        let redeemed = after.checked_sub(before).ok_or(StakingError::Underflow)?;
        msg!("Unwrapped {} proxy units into {} lamports", proxy_amount, redeemed);
        Ok(redeemed)
    }
}

impl YieldRate for CpiYieldSource<'_> {
    fn exchange_rate(&self) -> Result<u128> {
        read_exchange_rate(&self.program, &self.reserve)
    }
}
