use super::types::AnalysisWindow;

/// A simulation clock that walks the sample indices of an analysis window.
///
/// The `Clock` provides methods to advance hour by hour or run a function
/// at each hour until the end of the window is reached.
///
/// # Examples
///
/// ```
/// use heatpump_sim::sim::clock::Clock;
/// use heatpump_sim::sim::types::AnalysisWindow;
///
/// let window = AnalysisWindow::new(4, 6).unwrap();
/// let mut clock = Clock::over(window);
/// let mut hours = Vec::new();
///
/// clock.run(|index| hours.push(index));
/// assert_eq!(hours, vec![4, 5, 6]);
/// ```
pub struct Clock {
    /// Next sample index to hand out
    current: usize,
    /// Last sample index (inclusive)
    end: usize,
    done: bool,
}

impl Clock {
    /// Creates a clock covering every index of `window`, both ends included.
    pub fn over(window: AnalysisWindow) -> Self {
        Self {
            current: window.start_index,
            end: window.end_index,
            done: false,
        }
    }

    /// Advances the clock by one hour.
    ///
    /// # Returns
    ///
    /// * `Some(index)` - The sample index of the hour before advancing
    /// * `None` - If the window has been exhausted
    pub fn tick(&mut self) -> Option<usize> {
        if self.done {
            return None;
        }
        let index = self.current;
        if index == self.end {
            self.done = true;
        } else {
            self.current += 1;
        }
        Some(index)
    }

    /// Number of hours not yet handed out.
    pub fn remaining(&self) -> usize {
        if self.done { 0 } else { self.end - self.current + 1 }
    }

    /// Runs a function for each remaining hour of the window.
    ///
    /// # Arguments
    ///
    /// * `f` - A function that takes the current sample index as an argument
    pub fn run(&mut self, mut f: impl FnMut(usize)) {
        while let Some(index) = self.tick() {
            f(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_is_inclusive() {
        let mut clock = Clock::over(AnalysisWindow::new(2, 3).unwrap());
        assert_eq!(clock.remaining(), 2);
        assert_eq!(clock.tick(), Some(2));
        assert_eq!(clock.tick(), Some(3));
        assert_eq!(clock.tick(), None);
        assert_eq!(clock.remaining(), 0);
    }

    #[test]
    fn test_single_hour_window() {
        let mut clock = Clock::over(AnalysisWindow::new(7, 7).unwrap());
        let mut hours = Vec::new();
        clock.run(|i| hours.push(i));
        assert_eq!(hours, vec![7]);
    }
}
