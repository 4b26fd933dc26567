/// The member names a scan is restricted to.
///
/// Names are matched exactly against the name recorded in each header. A
/// name is consumed by the first member it matches, so once a scan returns
/// the names still left in the filter are the ones that were requested but
/// never seen. A filter built from no names at all selects every member.
#[derive(Debug, Clone, Default)]
pub struct MemberFilter {
    // `None` marks a name already matched.
    names: Vec<Option<Vec<u8>>>,
}

impl MemberFilter {
    /// Creates a filter selecting only the given names, in order.
    pub fn new<I, S>(names: I) -> MemberFilter
    where
        I: IntoIterator<Item = S>,
        S: Into<Vec<u8>>,
    {
        MemberFilter {
            names: names.into_iter().map(|n| Some(n.into())).collect(),
        }
    }

    /// Returns whether this filter was built without any name, in which case
    /// it selects every member.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Decides whether the member called `name` is selected.
    ///
    /// On a match the first outstanding entry equal to `name` is consumed.
    /// Duplicate names in the filter therefore need as many members of that
    /// name to be fully satisfied.
    pub fn select(&mut self, name: &[u8]) -> bool {
        if self.names.is_empty() {
            return true;
        }
        match self
            .names
            .iter_mut()
            .find(|slot| slot.as_deref() == Some(name))
        {
            Some(slot) => {
                *slot = None;
                true
            }
            None => false,
        }
    }

    /// Returns the names that have not matched any member yet, in the order
    /// they were given.
    pub fn missing(&self) -> impl Iterator<Item = &[u8]> {
        self.names.iter().filter_map(|n| n.as_deref())
    }
}
