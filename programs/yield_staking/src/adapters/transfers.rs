use anchor_lang::prelude::*;
use anchor_lang::system_program;
use anchor_spl::token;

use crate::constants::{CUSTODY_SEED, STAKE_POOL_SEED};
use crate::engine::Transfers;
use crate::error::StakingError;

/// Lamport and reward-token movements for one stakeholder.
///
/// Lamports move between the stakeholder and the custody PDA through the
/// system program; rewards leave the reward vault under the pool PDA's
/// signature. Every call is checked against the stakeholder it was built for.
pub struct PoolTransfers<'info> {
    pub user: AccountInfo<'info>,
    pub custody: AccountInfo<'info>,
    pub stake_pool: AccountInfo<'info>,
    pub system_program: AccountInfo<'info>,
    pub token_program: AccountInfo<'info>,
    /// Reward vault and the user's reward token account; only needed by
    /// instructions that can pay rewards.
    pub reward_accounts: Option<(AccountInfo<'info>, AccountInfo<'info>)>,
    pub reward_mint: Pubkey,
    pub pool_bump: u8,
    pub custody_bump: u8,
}

impl<'info> PoolTransfers<'info> {
    fn ensure_user(&self, account: &Pubkey) -> Result<()> {
        require_keys_eq!(*account, self.user.key(), StakingError::Unauthorized);
        Ok(())
    }
}

impl Transfers for PoolTransfers<'_> {
    fn accept(&mut self, from: &Pubkey, amount: u64) -> Result<()> {
        self.ensure_user(from)?;

        let cpi_accounts = system_program::Transfer {
            from: self.user.clone(),
            to: self.custody.clone(),
        };
        let cpi_ctx = CpiContext::new(self.system_program.clone(), cpi_accounts);
        system_program::transfer(cpi_ctx, amount)
    }

    fn release(&mut self, to: &Pubkey, amount: u64) -> Result<()> {
        self.ensure_user(to)?;
        if amount == 0 {
            return Ok(());
        }

        let stake_pool_key = self.stake_pool.key();
        let seeds = &[
            CUSTODY_SEED,
            stake_pool_key.as_ref(),
            &[self.custody_bump],
        ];
        let signer_seeds = &[&seeds[..]];

        let cpi_accounts = system_program::Transfer {
            from: self.custody.clone(),
            to: self.user.clone(),
        };
        let cpi_ctx =
            CpiContext::new_with_signer(self.system_program.clone(), cpi_accounts, signer_seeds);
        system_program::transfer(cpi_ctx, amount)
    }

    fn payout(&mut self, to: &Pubkey, amount: u64) -> Result<()> {
        self.ensure_user(to)?;
        let (reward_vault, user_reward_account) = self
            .reward_accounts
            .clone()
            .ok_or(StakingError::AccountMismatch)?;

        let seeds = &[
            STAKE_POOL_SEED,
            self.reward_mint.as_ref(),
            &[self.pool_bump],
        ];
        let signer_seeds = &[&seeds[..]];

        let cpi_accounts = token::Transfer {
            from: reward_vault,
            to: user_reward_account,
            authority: self.stake_pool.clone(),
        };
        let cpi_ctx =
            CpiContext::new_with_signer(self.token_program.clone(), cpi_accounts, signer_seeds);
        token::transfer(cpi_ctx, amount)
    }
}
