use bitflags::bitflags;

bitflags! {
    pub struct ClassAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const FINAL = 0x0010;
        const SUPER = 0x0020;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
    }
}

bitflags! {
    pub struct FieldAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const VOLATILE = 0x0040;
        const TRANSIENT = 0x0080;
        const SYNTHETIC = 0x1000;
        const ENUM = 0x4000;
    }
}

bitflags! {
    pub struct MethodAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const SYNCHRONIZED = 0x0020;
        const BRIDGE = 0x0040;
        const VARARGS = 0x0080;
        const NATIVE = 0x0100;
        const ABSTRACT = 0x0400;
        const STRICT = 0x0800;
        const SYNTHETIC = 0x1000;
    }
}

impl ClassAccessFlags {
    /// Declaration keywords for a class, e.g. `public final class`.
    ///
    /// An interface never renders `final` or `abstract`, whatever its bits say.
    pub fn modifiers(&self) -> String {
        let mut s = String::from(if self.contains(Self::PUBLIC) {
            "public"
        } else {
            "/* package */"
        });

        if self.contains(Self::SYNTHETIC) {
            s.push_str(" /* synthetic */");
        }

        if self.contains(Self::INTERFACE) {
            if self.contains(Self::ANNOTATION) {
                s.push_str(" @interface");
            } else {
                s.push_str(" interface");
            }
        } else {
            if self.contains(Self::FINAL) {
                s.push_str(" final");
            } else if self.contains(Self::ABSTRACT) {
                s.push_str(" abstract");
            }

            if self.contains(Self::ENUM) {
                s.push_str(" enum");
            } else {
                s.push_str(" class");
            }
        }

        s
    }
}

impl FieldAccessFlags {
    pub fn modifiers(&self) -> String {
        let mut s = String::from(visibility(
            self.contains(Self::PUBLIC),
            self.contains(Self::PRIVATE),
            self.contains(Self::PROTECTED),
        ));

        if self.contains(Self::STATIC) {
            s.push_str(" static");
        }

        if self.contains(Self::FINAL) {
            s.push_str(" final");
        } else if self.contains(Self::VOLATILE) {
            s.push_str(" volatile");
        }

        if self.contains(Self::TRANSIENT) {
            s.push_str(" transient");
        }

        if self.contains(Self::SYNTHETIC) {
            s.push_str(" /* synthetic */");
        }

        if self.contains(Self::ENUM) {
            s.push_str(" /* enum */");
        }

        s
    }
}

impl MethodAccessFlags {
    pub fn modifiers(&self) -> String {
        let mut s = String::from(visibility(
            self.contains(Self::PUBLIC),
            self.contains(Self::PRIVATE),
            self.contains(Self::PROTECTED),
        ));

        if self.contains(Self::ABSTRACT) {
            s.push_str(" abstract");
        } else {
            for (flag, keyword) in [
                (Self::STATIC, " static"),
                (Self::FINAL, " final"),
                (Self::SYNCHRONIZED, " synchronized"),
                (Self::NATIVE, " native"),
                (Self::STRICT, " strict"),
            ] {
                if self.contains(flag) {
                    s.push_str(keyword);
                }
            }
        }

        for (flag, marker) in [
            (Self::BRIDGE, " /* bridge */"),
            (Self::VARARGS, " /* varargs */"),
            (Self::SYNTHETIC, " /* synthetic */"),
        ] {
            if self.contains(flag) {
                s.push_str(marker);
            }
        }

        s
    }
}

fn visibility(public: bool, private: bool, protected: bool) -> &'static str {
    if public {
        "public"
    } else if private {
        "private"
    } else if protected {
        "protected"
    } else {
        "/* package */"
    }
}
