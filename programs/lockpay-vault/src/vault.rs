use anchor_lang::{
    error::ErrorCode::{AccountDidNotDeserialize, AccountDiscriminatorMismatch, AccountDiscriminatorNotFound},
    solana_program::pubkey::Pubkey,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vault {
    pub sender: Pubkey,
    pub receiver: Pubkey,
    pub amount: u64,
    pub claimed: bool,
    pub bump: u8,
}

impl Vault {
    pub const DISCRIMINATOR: [u8; 8] = [211, 8, 232, 43, 2, 152, 117, 119];

    /// sender + receiver + amount + claimed + bump
    pub const SPACE: usize = 32 + 32 + 8 + 1 + 1;

    pub const LEN: usize = 8 + Self::SPACE;

    pub fn try_deserialize(data: &[u8]) -> anchor_lang::Result<Self> {
        let mut offset = 0;

        // Check discriminator
        if data.len() < 8 {
            return Err(AccountDiscriminatorNotFound.into());
        }
        let discriminator = &data[offset..offset + 8];
        if discriminator != Self::DISCRIMINATOR {
            return Err(AccountDiscriminatorMismatch.into());
        }
        if data.len() < Self::LEN {
            return Err(AccountDidNotDeserialize.into());
        }
        offset += 8;

        let sender = Pubkey::new_from_array(
            data[offset..offset + 32]
                .try_into()
                .map_err(|_| AccountDidNotDeserialize)?,
        );
        offset += 32;

        let receiver = Pubkey::new_from_array(
            data[offset..offset + 32]
                .try_into()
                .map_err(|_| AccountDidNotDeserialize)?,
        );
        offset += 32;

        let amount = u64::from_le_bytes(
            data[offset..offset + 8]
                .try_into()
                .map_err(|_| AccountDidNotDeserialize)?,
        );
        offset += 8;

        let claimed = data[offset] != 0;
        offset += 1;

        let bump = data[offset];

        Ok(Self {
            sender,
            receiver,
            amount,
            claimed,
            bump,
        })
    }

    /// Account data in the layout the program writes.
    pub fn pack(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(Self::LEN);
        data.extend_from_slice(&Self::DISCRIMINATOR);
        data.extend_from_slice(&self.sender.to_bytes());
        data.extend_from_slice(&self.receiver.to_bytes());
        data.extend_from_slice(&self.amount.to_le_bytes());
        data.push(self.claimed as u8);
        data.push(self.bump);
        data
    }
}
