//! The named elliptic curve database used by the ECDSA/EdDSA analyzer.
//!
//! Only the curves the `pkix` OID registry recognizes are modeled; an
//! unrecognized `namedCurve` OID or an explicit (non-named) `ECParameters`
//! is diagnosable rather than a hard error (`PublicKey_ECC_UnknownCurve` /
//! `PublicKey_ECC_ExplicitCurve`).

use lazy_static::lazy_static;

use asn::ObjectIdentifier;
use math::big::{BigInt, BigUint, Modulo};
use math::integer::Integer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Prime,
    Binary,
}

#[derive(Debug, Clone)]
pub struct EllipticCurve {
    pub name: &'static str,
    pub field: FieldKind,
    pub p: BigUint,
    pub a: BigInt,
    pub b: BigInt,
    pub gx: BigUint,
    pub gy: BigUint,
    pub n: BigUint,
    pub bits: u32,
    pub koblitz: bool,
}

impl EllipticCurve {
    /// Whether `(x, y)` satisfies the short Weierstrass equation
    /// `y^2 = x^3 + a*x + b (mod p)`. Only meaningful for prime-field
    /// curves; callers must not invoke this on a binary-field curve.
    pub fn contains_point(&self, x: &BigUint, y: &BigUint) -> bool {
        assert_eq!(self.field, FieldKind::Prime, "contains_point is prime-field only");

        let m = Modulo::new(&self.p);
        let lhs = m.mul(y, y);

        let x3 = m.mul(&m.mul(x, x), x);
        let ax = mod_mul_signed(&m, &self.a, x);
        let b = signed_mod(&m, &self.b);

        let rhs = m.add(&m.add(&x3, &ax), &b);
        lhs == rhs
    }
}

fn signed_mod(m: &Modulo<'_>, v: &BigInt) -> BigUint {
    if v.is_negative() {
        m.negate(&v.magnitude().clone())
    } else {
        m.rem(&v.to_uint().unwrap())
    }
}

fn mod_mul_signed(m: &Modulo<'_>, coeff: &BigInt, x: &BigUint) -> BigUint {
    let c = signed_mod(m, coeff);
    m.mul(&c, x)
}

fn h(s: &str) -> BigUint {
    BigUint::from_be_bytes(&common::hex::decode(s).expect("static curve constant is valid hex"))
}

fn hi(s: &str) -> BigInt {
    BigInt::from(h(s))
}

lazy_static! {
    pub static ref SECP192R1: EllipticCurve = EllipticCurve {
        name: "secp192r1",
        field: FieldKind::Prime,
        p: h("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFFFFFFFFFFFF"),
        a: hi("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFFFFFFFFFFFC"),
        b: hi("64210519E59C80E70FA7E9AB72243049FEB8DEECC146B9B1"),
        gx: h("188DA80EB03090F67CBF20EB43A18800F4FF0AFD82FF1012"),
        gy: h("07192B95FFC8DA78631011ED6B24CDD573F977A11E794811"),
        n: h("FFFFFFFFFFFFFFFFFFFFFFFF99DEF836146BC9B1B4D22831"),
        bits: 192,
        koblitz: false,
    };
    pub static ref SECP224R1: EllipticCurve = EllipticCurve {
        name: "secp224r1",
        field: FieldKind::Prime,
        p: h("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF000000000000000000000001"),
        a: hi("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFFFFFFFFFFFFFFFFFFFE"),
        b: hi("B4050A850C04B3ABF54132565044B0B7D7BFD8BA270B39432355FFB4"),
        gx: h("B70E0CBD6BB4BF7F321390B94A03C1D356C21122343280D6115C1D21"),
        gy: h("BD376388B5F723FB4C22DFE6CD4375A05A07476444D5819985007E34"),
        n: h("FFFFFFFFFFFFFFFFFFFFFFFFFFFF16A2E0B8F03E13DD29455C5C2A3D"),
        bits: 224,
        koblitz: false,
    };
    pub static ref SECP256R1: EllipticCurve = EllipticCurve {
        name: "secp256r1",
        field: FieldKind::Prime,
        p: h("FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFF"),
        a: hi("FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFC"),
        b: hi("5AC635D8AA3A93E7B3EBBD55769886BC651D06B0CC53B0F63BCE3C3E27D2604B"),
        gx: h("6B17D1F2E12C4247F8BCE6E563A440F277037D812DEB33A0F4A13945D898C296"),
        gy: h("4FE342E2FE1A7F9B8EE7EB4A7C0F9E162BCE33576B315ECECBB6406837BF51F5"),
        n: h("FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551"),
        bits: 256,
        koblitz: false,
    };
    pub static ref SECP384R1: EllipticCurve = EllipticCurve {
        name: "secp384r1",
        field: FieldKind::Prime,
        p: h("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFFFF0000000000000000FFFFFFFF"),
        a: hi("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFFFF0000000000000000FFFFFFFC"),
        b: hi("B3312FA7E23EE7E4988E056BE3F82D19181D9C6EFE8141120314088F5013875AC656398D8A2ED19D2A85C8EDD3EC2AEF"),
        gx: h("AA87CA22BE8B05378EB1C71EF320AD746E1D3B628BA79B9859F741E082542A385502F25DBF55296C3A545E3872760AB7"),
        gy: h("3617DE4A96262C6F5D9E98BF9292DC29F8F41DBD289A147CE9DA3113B5F0B8C00A60B1CE1D7E819D7A431D7C90EA0E5F"),
        n: h("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFC7634D81F4372DDF581A0DB248B0A77AECEC196ACCC52973"),
        bits: 384,
        koblitz: false,
    };
    pub static ref SECP521R1: EllipticCurve = EllipticCurve {
        name: "secp521r1",
        field: FieldKind::Prime,
        p: h(&("01".to_string() + &"FF".repeat(65))),
        a: hi(&("01".to_string() + &"FF".repeat(64) + "FC")),
        b: hi("0051953EB9618E1C9A1F929A21A0B68540EEA2DA725B99B315F3B8B489918EF109E156193951EC7E937B1652C0BD3BB1BF073573DF883D2C34F1EF451FD46B503F00"),
        gx: h("00C6858E06B70404E9CD9E3ECB662395B4429C648139053FB521F828AF606B4D3DBAA14B5E77EFE75928FE1DC127A2FFA8DE3348B3C1856A429BF97E7E31C2E5BD66"),
        gy: h("011839296A789A3BC0045C8A5FB42C7D1BD998F54449579B446817AFBD17273E662C97EE72995EF42640C550B9013FAD0761353C7086A272C24088BE94769FD16650"),
        n: h("01FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFA51868783BF2F966B7FCC0148F709A5D03BB5C9B8899C47AEBB6FB71E91386409"),
        bits: 521,
        koblitz: false,
    };
    pub static ref SECP256K1: EllipticCurve = EllipticCurve {
        name: "secp256k1",
        field: FieldKind::Prime,
        p: h("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F"),
        a: BigInt::from(0i64),
        b: BigInt::from(7i64),
        gx: h("79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798"),
        gy: h("483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8"),
        n: h("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141"),
        bits: 256,
        koblitz: true,
    };
}

/// Looks up a named curve by its `namedCurve` OID (RFC 5480 §2.1.1.1).
pub fn by_oid(oid: &ObjectIdentifier) -> Option<&'static EllipticCurve> {
    if *oid == *pkix::oid::CURVE_SECP192R1 {
        Some(&SECP192R1)
    } else if *oid == *pkix::oid::CURVE_SECP224R1 {
        Some(&SECP224R1)
    } else if *oid == *pkix::oid::CURVE_SECP256R1 {
        Some(&SECP256R1)
    } else if *oid == *pkix::oid::CURVE_SECP384R1 {
        Some(&SECP384R1)
    } else if *oid == *pkix::oid::CURVE_SECP521R1 {
        Some(&SECP521R1)
    } else if *oid == *pkix::oid::CURVE_SECP256K1 {
        Some(&SECP256K1)
    } else {
        None
    }
}
