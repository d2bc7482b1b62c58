use mapsight::GameData;

/// Raises one warning each time the local player's life falls below the
/// threshold outside a town.
#[derive(Debug)]
pub struct LifeWatch {
    threshold: f64,
    low: bool,
}

impl LifeWatch {
    pub fn new(threshold_percent: u8) -> Self {
        Self {
            threshold: threshold_percent as f64,
            low: false,
        }
    }

    /// Returns the life percentage when a new warning is due.
    pub fn check(&mut self, data: &GameData) -> Option<f64> {
        let percent = data.player_unit.data.life.map(|life| life.percent());
        self.update(percent, data.in_town())
    }

    fn update(&mut self, percent: Option<f64>, in_town: bool) -> Option<f64> {
        let Some(percent) = percent.filter(|&p| p > 0.0) else {
            // Dead or no stat list: nothing to warn about until life is back
            self.low = false;
            return None;
        };
        if in_town || percent >= self.threshold {
            self.low = false;
            return None;
        }
        if self.low {
            return None;
        }
        self.low = true;
        Some(percent)
    }
}
