use serde::{Deserialize, Serialize};

use crate::game::UnitId;
use crate::process::layout::{hover, menu};
use crate::process::{ByteBuffer, FromMemory};

/// Which in-game menus and panels are open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MenuData {
    pub in_game: bool,
    pub inventory: bool,
    pub character: bool,
    pub skill_tree: bool,
    pub esc_menu: bool,
    pub map: bool,
    pub npc_interact: bool,
    pub stash: bool,
}

impl FromMemory for MenuData {
    const SIZE: usize = menu::SIZE;

    fn from_le_bytes(bytes: &[u8]) -> Option<Self> {
        let buf = ByteBuffer::new(bytes);
        let flag = |offset| buf.u8_at(offset).map(|b| b != 0);
        Some(Self {
            in_game: flag(menu::IN_GAME)?,
            inventory: flag(menu::INVENTORY)?,
            character: flag(menu::CHARACTER)?,
            skill_tree: flag(menu::SKILL_TREE)?,
            esc_menu: flag(menu::ESC_MENU)?,
            map: flag(menu::MAP)?,
            npc_interact: flag(menu::NPC_INTERACT)?,
            stash: flag(menu::STASH)?,
        })
    }
}

/// The unit under the mouse cursor, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HoverData {
    pub is_hovered: bool,
    pub unit_type: u32,
    pub unit_id: UnitId,
}

impl FromMemory for HoverData {
    const SIZE: usize = hover::SIZE;

    fn from_le_bytes(bytes: &[u8]) -> Option<Self> {
        let buf = ByteBuffer::new(bytes);
        Some(Self {
            is_hovered: buf.u8_at(hover::IS_HOVERED)? != 0,
            unit_type: buf.u32_at(hover::UNIT_TYPE)?,
            unit_id: buf.u32_at(hover::UNIT_ID)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_flags() {
        let mut bytes = vec![0u8; menu::SIZE];
        bytes[menu::IN_GAME as usize] = 1;
        bytes[menu::MAP as usize] = 1;

        let data = MenuData::from_le_bytes(&bytes).unwrap();
        assert!(data.in_game);
        assert!(data.map);
        assert!(!data.esc_menu);
        assert!(MenuData::from_le_bytes(&bytes[..4]).is_none());
    }

    #[test]
    fn test_hover_decode() {
        let mut bytes = vec![0u8; hover::SIZE];
        bytes[0] = 1;
        bytes[hover::UNIT_TYPE as usize] = 1;
        bytes[hover::UNIT_ID as usize] = 77;

        let data = HoverData::from_le_bytes(&bytes).unwrap();
        assert!(data.is_hovered);
        assert_eq!(data.unit_type, 1);
        assert_eq!(data.unit_id, 77);
    }
}
