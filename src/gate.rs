/// Gate is one of the four reversible 3-bit gates a layer can run.
///
/// The 2-bit selector code of a layer maps onto the variants in declaration
/// order (`00` Toffoli, `01` mirrored Toffoli, `10` Fredkin, `11` mirrored Fredkin).
/// Every variant is an involution, so the same function both applies and undoes a gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gate {
    /// Controlled-controlled-NOT: `c ^= a & b`.
    Toffoli,
    /// Toffoli with the target moved to the other end of the triple: `a ^= b & c`.
    MirroredToffoli,
    /// Controlled swap: `c` set swaps `a` and `b`.
    Fredkin,
    /// Fredkin with roles rotated by one: `a` set swaps `b` and `c`.
    MirroredFredkin,
}

const BY_CODE: [Gate; 4] = [
    Gate::Toffoli,
    Gate::MirroredToffoli,
    Gate::Fredkin,
    Gate::MirroredFredkin,
];

impl Gate {
    /// All gate variants, in selector-code order.
    pub const ALL: [Gate; 4] = BY_CODE;

    /// from_code maps a 2-bit selector onto its gate. Only the low two bits are read.
    #[inline(always)]
    pub fn from_code(code: u8) -> Self {
        BY_CODE[(code & 0b11) as usize]
    }

    /// code returns the 2-bit selector for this gate.
    pub fn code(self) -> u8 {
        match self {
            Gate::Toffoli => 0b00,
            Gate::MirroredToffoli => 0b01,
            Gate::Fredkin => 0b10,
            Gate::MirroredFredkin => 0b11,
        }
    }

    /// apply runs the gate on an `(a, b, c)` triple and returns the new triple.
    #[inline(always)]
    pub fn apply(self, [a, b, c]: [bool; 3]) -> [bool; 3] {
        match self {
            Gate::Toffoli => [a, b, c ^ (a & b)],
            Gate::MirroredToffoli => [a ^ (b & c), b, c],
            Gate::Fredkin if c => [b, a, c],
            Gate::MirroredFredkin if a => [a, c, b],
            Gate::Fredkin | Gate::MirroredFredkin => [a, b, c],
        }
    }
}
