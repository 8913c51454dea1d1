use chrono::{DateTime, FixedOffset, Local, TimeZone};
use std::cell::RefCell;

/// Source de l'heure murale, dans le fuseau qui fixe les minuits locaux.
pub trait Clock {
    type Tz: TimeZone;

    fn now(&self) -> DateTime<Self::Tz>;
}

/// Horloge système, fuseau local de la machine (changements d'heure compris).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Tz = Local;

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Horloge manuelle pour les tests et les rejeux.
#[derive(Debug, Clone)]
pub struct FixedClock<Tz: TimeZone = FixedOffset> {
    at: RefCell<DateTime<Tz>>,
}

impl<Tz: TimeZone> FixedClock<Tz> {
    pub fn new(at: DateTime<Tz>) -> Self {
        Self {
            at: RefCell::new(at),
        }
    }

    pub fn set(&self, at: DateTime<Tz>) {
        *self.at.borrow_mut() = at;
    }
}

impl<Tz: TimeZone> Clock for FixedClock<Tz> {
    type Tz = Tz;

    fn now(&self) -> DateTime<Tz> {
        self.at.borrow().clone()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    type Tz = C::Tz;

    fn now(&self) -> DateTime<C::Tz> {
        (**self).now()
    }
}
