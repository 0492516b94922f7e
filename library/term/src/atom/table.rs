use lazy_static::lazy_static;
use log::trace;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// The interned data of an atom, valid for the lifetime of the program
#[derive(Debug)]
pub struct AtomData {
    name: &'static str,
    utf8: bool,
}
impl AtomData {
    pub(super) const TRUE: Self = Self::new_static("true");
    pub(super) const FALSE: Self = Self::new_static("false");
    pub(super) const NIL: Self = Self::new_static("nil");
    pub(super) const UNDEFINED: Self = Self::new_static("undefined");
    pub(super) const EMPTY: Self = Self::new_static("");

    const fn new_static(name: &'static str) -> Self {
        Self { name, utf8: false }
    }

    #[inline(always)]
    pub fn as_str(&self) -> &'static str {
        self.name
    }

    #[inline(always)]
    pub fn is_utf8(&self) -> bool {
        self.utf8
    }
}

lazy_static! {
    /// The global atom table
    static ref ATOMS: RwLock<AtomTable> = Default::default();
}

struct AtomTable {
    ids: FxHashMap<&'static str, &'static AtomData>,
}
impl Default for AtomTable {
    fn default() -> Self {
        let mut ids = FxHashMap::default();
        let seeded: [&'static AtomData; 5] = [
            &AtomData::TRUE,
            &AtomData::FALSE,
            &AtomData::NIL,
            &AtomData::UNDEFINED,
            &AtomData::EMPTY,
        ];
        for data in seeded {
            ids.insert(data.as_str(), data);
        }
        Self { ids }
    }
}

/// Looks up the interned data for `name`, if it exists
pub(super) fn get_data(name: &str) -> Option<&'static AtomData> {
    ATOMS.read().ids.get(name).copied()
}

/// Returns the interned data for `name`, interning it first if necessary
pub(super) fn get_or_insert(name: &str) -> &'static AtomData {
    if let Some(data) = get_data(name) {
        return data;
    }

    let mut table = ATOMS.write();
    // Another writer may have won the race between our read and write locks
    if let Some(data) = table.ids.get(name) {
        return *data;
    }

    let name: &'static str = Box::leak(name.to_string().into_boxed_str());
    let data: &'static AtomData = Box::leak(Box::new(AtomData {
        name,
        utf8: !name.is_ascii(),
    }));
    trace!("interned atom '{}'", name);
    table.ids.insert(name, data);
    data
}

/// The number of atoms in the table
pub(super) fn len() -> usize {
    ATOMS.read().ids.len()
}
